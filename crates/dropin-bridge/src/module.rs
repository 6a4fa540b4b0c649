//! Drop-in Module
//!
//! The object the host calls into. Host commands never return errors; every
//! failure is reported as a `didFailCallback` event instead.

use std::sync::Arc;

use serde_json::Value;

use dropin_core::value::{json_to_map, map_to_json};
use dropin_core::{
    CheckoutError, CheckoutLauncher, EventSink, HostError, HostMap, LifecycleEvent, NativeError,
    PaymentMethodsResponse, Result, SessionCallbacks, SessionId, SessionRegistry,
};

use crate::assemble::drop_in_configuration;
use crate::events::{EventEmitter, HostContext, HostEvent, RETURN_URL_KEY};

/// Name the host runtime knows this module by
pub const MODULE_NAME: &str = "AdyenDropIn";

/// Host-facing drop-in module
pub struct DropInModule {
    registry: Arc<SessionRegistry>,
    launcher: Arc<dyn CheckoutLauncher>,
    emitter: Arc<dyn EventEmitter>,
    context: Arc<dyn HostContext>,
}

impl DropInModule {
    /// Create a module and register it as the registry's event sink
    pub fn new(
        registry: Arc<SessionRegistry>,
        launcher: Arc<dyn CheckoutLauncher>,
        emitter: Arc<dyn EventEmitter>,
        context: Arc<dyn HostContext>,
    ) -> Arc<Self> {
        let module = Arc::new(Self {
            registry,
            launcher,
            emitter,
            context,
        });
        module.registry.register_event_sink(&module);
        module
    }

    pub const fn name(&self) -> &'static str {
        MODULE_NAME
    }

    /// Present the drop-in. Outcomes arrive as events.
    pub fn open(self: &Arc<Self>, payment_methods: &HostMap, configuration: &HostMap) {
        if let Err(e) = self.try_open(payment_methods, configuration) {
            tracing::warn!(error = %e, "Could not open drop-in");
            self.emit_error(&e);
        }
    }

    /// Resolve the action the host received in `didSubmitCallback` or
    /// `didProvideActionCallback`
    pub fn handle(&self, action: &HostMap) {
        if let Err(e) = self.try_handle(action) {
            tracing::warn!(error = %e, "Could not handle action");
            self.emit_error(&e);
        }
    }

    /// Close the drop-in, successfully or not
    pub fn hide(&self, success: bool, message: Option<&HostMap>) {
        if let Err(e) = self.try_hide(success, message) {
            tracing::warn!(error = %e, "Could not hide drop-in");
            self.emit_error(&e);
        }
    }

    /// The host runtime manages subscriptions itself
    pub fn add_listener(&self, event_name: &str) {
        tracing::trace!(event_name, "add_listener");
    }

    /// The host runtime manages subscriptions itself
    pub fn remove_listeners(&self, count: u32) {
        tracing::trace!(count, "remove_listeners");
    }

    fn try_open(
        self: &Arc<Self>,
        payment_methods: &HostMap,
        configuration: &HostMap,
    ) -> Result<SessionId> {
        let payment_methods = PaymentMethodsResponse::from_host(payment_methods)?;
        let configuration = drop_in_configuration(configuration)?;

        tracing::info!(
            launcher = self.launcher.name(),
            environment = %configuration.context.environment,
            methods = payment_methods.payment_methods.len(),
            stored = payment_methods.stored_payment_methods.len(),
            google_pay = configuration.google_pay.is_some(),
            "Launching drop-in"
        );

        self.registry.register_event_sink(self);
        let callbacks = SessionCallbacks::new(self.registry.clone());
        let session_id = callbacks.session_id().clone();

        let session = match self.launcher.launch(payment_methods, configuration, callbacks) {
            Ok(session) => session,
            Err(e) => {
                self.registry.end_session(&session_id);
                return Err(e);
            }
        };

        // The flow may already have ended from inside `launch`
        if !self.registry.register_action_sink(&session_id, session) {
            tracing::info!(%session_id, "Drop-in finished before launch returned");
        }
        Ok(session_id)
    }

    fn try_handle(&self, action: &HostMap) -> Result<()> {
        let session = self
            .registry
            .current_action_sink()
            .ok_or_else(CheckoutError::missing_session)?;
        let action = map_to_json(action)?;

        let action_type = action.get("type").and_then(Value::as_str);
        tracing::debug!(action_type, "Forwarding action");
        session.handle_action(action);
        Ok(())
    }

    fn try_hide(&self, success: bool, message: Option<&HostMap>) -> Result<()> {
        let (session_id, session) = self
            .registry
            .current_session()
            .ok_or_else(CheckoutError::missing_session)?;
        let message = message.map(map_to_json).transpose()?;

        if success {
            session.complete(message);
        } else {
            session.fail(message);
        }
        self.registry.end_session(&session_id);
        Ok(())
    }

    fn on_did_submit(&self, payload: &Value) {
        match json_to_map(payload) {
            Ok(mut map) => {
                map.insert(RETURN_URL_KEY, self.context.return_url());
                self.emitter.emit(HostEvent::DidSubmit(map));
            }
            Err(e) => self.emit_error(&e),
        }
    }

    fn on_did_provide(&self, payload: &Value) {
        match json_to_map(payload) {
            Ok(map) => self.emitter.emit(HostEvent::DidProvide(map)),
            Err(e) => self.emit_error(&e),
        }
    }

    fn on_did_fail(&self, error: NativeError) {
        tracing::info!(error = %error, "Drop-in reported failure");
        self.emitter.emit(HostEvent::DidFail(HostError::from(error)));
    }

    fn emit_error(&self, error: &CheckoutError) {
        self.emitter.emit(HostEvent::DidFail(HostError::from(error)));
    }
}

impl EventSink for DropInModule {
    fn on_lifecycle_event(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Submitted(payload) => self.on_did_submit(&payload),
            LifecycleEvent::ActionRequired(payload) => self.on_did_provide(&payload),
            LifecycleEvent::Failed(error) => self.on_did_fail(error),
        }
    }
}
