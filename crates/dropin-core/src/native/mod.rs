//! Native Drop-in Integration
//!
//! The native checkout UI is an opaque collaborator. The bridge only ever
//! talks to it through these two traits, so a platform implementation and the
//! in-crate mock are interchangeable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let callbacks = SessionCallbacks::new(registry.clone());
//! let session_id = callbacks.session_id().clone();
//! let session = launcher.launch(payment_methods, configuration, callbacks)?;
//! registry.register_action_sink(&session_id, session);
//! ```

pub mod mock;

pub use mock::{MockDropIn, MockSession, SessionOutcome};

use std::sync::Arc;

use serde_json::Value;

use crate::config::{DropInConfiguration, PaymentMethodsResponse};
use crate::error::Result;
use crate::session::SessionCallbacks;

/// Commands accepted by one live native flow
pub trait SessionHandle: Send + Sync {
    /// Resolve an in-flight action (redirect, 3DS2 challenge, ...)
    fn handle_action(&self, action: Value);

    /// Close the flow successfully
    fn complete(&self, message: Option<Value>);

    /// Close the flow with an error
    fn fail(&self, message: Option<Value>);
}

/// Entry point of the native drop-in (Strategy pattern)
///
/// Implement this once per platform. Lifecycle outcomes are reported
/// asynchronously, possibly from another thread, through `callbacks`.
pub trait CheckoutLauncher: Send + Sync {
    /// Present the drop-in and return the handle of the new flow
    fn launch(
        &self,
        payment_methods: PaymentMethodsResponse,
        configuration: DropInConfiguration,
        callbacks: SessionCallbacks,
    ) -> Result<Arc<dyn SessionHandle>>;

    /// Implementation name, for logs
    fn name(&self) -> &str;
}
