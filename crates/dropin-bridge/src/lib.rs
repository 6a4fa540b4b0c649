//! # dropin-bridge
//!
//! Host-facing side of the drop-in checkout bridge.
//!
//! ## Flow
//!
//! ```text
//! host ── open(paymentMethods, configuration) ──▶ DropInModule ──▶ CheckoutLauncher
//!                                                     ▲                 │
//!                                                     │ EventSink       │ SessionCallbacks
//!                                                     │                 ▼
//! host ◀── didSubmitCallback / didProvideActionCallback / didFailCallback ── SessionRegistry
//! host ── handle(action) / hide(success, message) ──▶ DropInModule ──▶ SessionHandle
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dropin_bridge::{BridgeConfig, ChannelEmitter, PaymentPackage};
//!
//! let package = PaymentPackage::new(&BridgeConfig::from_env()?);
//! let (emitter, mut events) = ChannelEmitter::new();
//! let module = package.create_drop_in_module(launcher, Arc::new(emitter));
//!
//! module.open(&payment_methods, &configuration);
//! while let Some(event) = events.recv().await {
//!     // forward to the host runtime
//! }
//! ```

mod assemble;
mod config;
mod events;
mod module;
mod package;

pub use assemble::drop_in_configuration;
pub use config::BridgeConfig;
pub use events::{
    AppContext, ChannelEmitter, DID_FAIL, DID_PROVIDE, DID_SUBMIT, EventEmitter, HostContext,
    HostEvent, RETURN_URL_KEY,
};
pub use module::{DropInModule, MODULE_NAME};
pub use package::PaymentPackage;
