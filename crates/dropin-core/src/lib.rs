//! # dropin-core
//!
//! Host-agnostic core of the drop-in checkout bridge: typed configuration,
//! host value conversion, the session registry and the native collaborator
//! traits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        dropin-core                            │
//! │  ┌──────────────┐  ┌─────────────────┐  ┌─────────────────┐  │
//! │  │    config    │  │ SessionRegistry │  │ CheckoutLauncher│  │
//! │  │   parsers    │  │  (event sink /  │──│ SessionHandle   │  │
//! │  │              │  │   action sink)  │  │   (Strategy)    │  │
//! │  └──────────────┘  └─────────────────┘  └─────────────────┘  │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐  │
//! │  │ value: HostValue ⇄ JSON  │  │ error: CheckoutError →   │  │
//! │  │                          │  │        HostError         │  │
//! │  └──────────────────────────┘  └──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `CheckoutLauncher` trait lets a platform drop-in, or the bundled
//! [`MockDropIn`](native::MockDropIn), sit behind the bridge unchanged.

pub mod config;
pub mod error;
pub mod native;
pub mod session;
pub mod value;

pub use config::{DropInConfiguration, PaymentMethodsResponse};
pub use error::{CheckoutError, HostError, NativeError, Result};
pub use native::{CheckoutLauncher, SessionHandle};
pub use session::{
    DeliveryPolicy, EventSink, LifecycleEvent, SessionCallbacks, SessionId, SessionInfo,
    SessionRegistry,
};
pub use value::{HostMap, HostValue};
