//! Mock Native Drop-in
//!
//! For testing and demo purposes. Records every launch and command; in
//! interactive mode it also plays the shopper's part and answers like the real
//! drop-in would.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use super::{CheckoutLauncher, SessionHandle};
use crate::config::{DropInConfiguration, PaymentMethodsResponse};
use crate::error::{CheckoutError, NativeError, Result};
use crate::session::SessionCallbacks;

/// How a mock session was closed by the host
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Completed(Option<Value>),
    Failed(Option<Value>),
}

/// A recorded native flow
#[derive(Default)]
pub struct MockSession {
    actions: Mutex<Vec<Value>>,
    outcome: Mutex<Option<SessionOutcome>>,

    /// Present in interactive mode: answers every action with details
    responder: Option<SessionCallbacks>,
}

impl MockSession {
    fn interactive(callbacks: SessionCallbacks) -> Self {
        Self {
            responder: Some(callbacks),
            ..Self::default()
        }
    }

    /// Actions forwarded by the host, in order
    pub fn actions(&self) -> Vec<Value> {
        lock(&self.actions).clone()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        lock(&self.outcome).clone()
    }
}

impl SessionHandle for MockSession {
    fn handle_action(&self, action: Value) {
        lock(&self.actions).push(action.clone());

        if let Some(callbacks) = &self.responder {
            callbacks.on_provide(json!({
                "details": { "redirectResult": "simulated" },
                "paymentData": action.get("paymentData").cloned().unwrap_or(Value::Null),
            }));
        }
    }

    fn complete(&self, message: Option<Value>) {
        *lock(&self.outcome) = Some(SessionOutcome::Completed(message));
    }

    fn fail(&self, message: Option<Value>) {
        *lock(&self.outcome) = Some(SessionOutcome::Failed(message));
    }
}

/// Arguments of one `launch` call
#[derive(Clone, Debug)]
pub struct LaunchRecord {
    pub payment_methods: PaymentMethodsResponse,
    pub configuration: DropInConfiguration,
}

/// Mock launcher
#[derive(Default)]
pub struct MockDropIn {
    launches: Mutex<Vec<LaunchRecord>>,
    sessions: Mutex<Vec<Arc<MockSession>>>,
    callbacks: Mutex<Option<SessionCallbacks>>,
    refuse_launch: bool,
    abort_on_launch: bool,
    interactive: bool,
}

impl MockDropIn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher whose every `launch` fails
    pub fn refusing() -> Self {
        Self {
            refuse_launch: true,
            ..Self::default()
        }
    }

    /// Launcher whose flow fails before `launch` returns, yet still hands
    /// back a session
    pub fn aborting() -> Self {
        Self {
            abort_on_launch: true,
            ..Self::default()
        }
    }

    /// Launcher that submits the first payment method right after launch and
    /// answers actions with additional details
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    pub fn launch_count(&self) -> usize {
        lock(&self.launches).len()
    }

    pub fn last_launch(&self) -> Option<LaunchRecord> {
        lock(&self.launches).last().cloned()
    }

    pub fn last_session(&self) -> Option<Arc<MockSession>> {
        lock(&self.sessions).last().cloned()
    }

    /// Callbacks of the latest flow, to simulate native outcomes
    pub fn callbacks(&self) -> Option<SessionCallbacks> {
        lock(&self.callbacks).clone()
    }
}

impl CheckoutLauncher for MockDropIn {
    fn launch(
        &self,
        payment_methods: PaymentMethodsResponse,
        configuration: DropInConfiguration,
        callbacks: SessionCallbacks,
    ) -> Result<Arc<dyn SessionHandle>> {
        if self.refuse_launch {
            return Err(CheckoutError::Launch("drop-in unavailable".into()));
        }

        let first_method = payment_methods
            .method_types()
            .first()
            .map(|t| (*t).to_string());

        lock(&self.launches).push(LaunchRecord {
            payment_methods,
            configuration,
        });
        *lock(&self.callbacks) = Some(callbacks.clone());

        let session = Arc::new(if self.interactive {
            MockSession::interactive(callbacks.clone())
        } else {
            MockSession::default()
        });
        lock(&self.sessions).push(session.clone());

        if self.abort_on_launch {
            callbacks.on_fail(
                NativeError::new("Drop-in closed during launch").with_code("launchAborted"),
            );
        } else if self.interactive {
            if let Some(method_type) = first_method {
                callbacks.on_submit(json!({
                    "paymentMethod": { "type": method_type },
                    "storePaymentMethod": false,
                }));
            }
        }

        Ok(session)
    }

    fn name(&self) -> &str {
        "MockDropIn"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
