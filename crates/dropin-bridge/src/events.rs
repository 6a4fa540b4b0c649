//! Host Events
//!
//! Everything the bridge reports to the host travels as one of three named
//! events. Delivery is behind [`EventEmitter`]; the host runtime owns
//! subscription.

use serde::Serialize;
use tokio::sync::mpsc;

use dropin_core::{HostError, HostMap};

pub const DID_SUBMIT: &str = "didSubmitCallback";
pub const DID_PROVIDE: &str = "didProvideActionCallback";
pub const DID_FAIL: &str = "didFailCallback";

/// Key added to submission payloads
pub const RETURN_URL_KEY: &str = "returnUrl";

/// Event sent to the host
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum HostEvent {
    /// Shopper submitted payment data; carries `returnUrl`
    #[serde(rename = "didSubmitCallback")]
    DidSubmit(HostMap),

    /// Additional details after an action
    #[serde(rename = "didProvideActionCallback")]
    DidProvide(HostMap),

    #[serde(rename = "didFailCallback")]
    DidFail(HostError),
}

impl HostEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DidSubmit(_) => DID_SUBMIT,
            Self::DidProvide(_) => DID_PROVIDE,
            Self::DidFail(_) => DID_FAIL,
        }
    }
}

/// Sends events to the host runtime
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: HostEvent);
}

/// Emitter backed by a tokio channel; the host drains the receiver
#[derive(Clone)]
pub struct ChannelEmitter {
    sender: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelEmitter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventEmitter for ChannelEmitter {
    fn emit(&self, event: HostEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            tracing::warn!(event = name, "Host event receiver closed, event lost");
        }
    }
}

/// Application facts the bridge needs from the host
pub trait HostContext: Send + Sync {
    /// URL the shopper returns to after a redirect
    fn return_url(&self) -> String;
}

/// Host context derived from the application identifier
#[derive(Clone, Debug)]
pub struct AppContext {
    package_name: String,
}

impl AppContext {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }
}

impl HostContext for AppContext {
    fn return_url(&self) -> String {
        format!("adyencheckout://{}", self.package_name)
    }
}
