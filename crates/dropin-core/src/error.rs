//! Error Types
//!
//! Every failure the bridge can observe ends up in front of the host as the
//! same `{errorMessage, code}` shape. [`CheckoutError`] is the internal
//! taxonomy; [`HostError`] is what crosses the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Bridge error types
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Required configuration field absent or of the wrong shape
    #[error("No `{0}` in configuration")]
    FieldNotFound(String),

    /// Payment methods descriptor could not be understood
    #[error("Invalid payment methods: {0}")]
    InvalidPaymentMethods(String),

    /// Payload could not be converted between host and JSON shapes
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Host command arrived with no live native session
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Native subsystem refused to start a flow
    #[error("Launch failed: {0}")]
    Launch(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bridge configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// Shorthand for the missing-listener condition raised by `handle` and `hide`
    pub fn missing_session() -> Self {
        Self::InvalidState("DropInModuleListener is missing".into())
    }

    /// Stable machine-readable code sent to the host
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FieldNotFound(_) => "FIELD_NOT_FOUND",
            Self::InvalidPaymentMethods(_) => "INVALID_PAYMENT_METHODS",
            Self::Conversion(_) => "CONVERSION_FAILED",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Launch(_) => "LAUNCH_FAILED",
            Self::Json(_) => "INVALID_JSON",
            Self::Config(_) => "CONFIGURATION",
        }
    }

    /// Configuration errors are the only kind raised before a flow starts
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::FieldNotFound(_) | Self::InvalidPaymentMethods(_) | Self::Config(_)
        )
    }
}

/// Failure reported by the native subsystem itself
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeError {
    pub message: String,

    /// Native reason code, when the subsystem supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl std::fmt::Display for NativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Host-visible error payload of a `didFailCallback` event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostError {
    pub error_message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl HostError {
    pub fn new(error_message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            error_message: error_message.into(),
            code,
        }
    }
}

impl From<&CheckoutError> for HostError {
    fn from(err: &CheckoutError) -> Self {
        Self::new(err.to_string(), Some(err.code().to_string()))
    }
}

impl From<CheckoutError> for HostError {
    fn from(err: CheckoutError) -> Self {
        Self::from(&err)
    }
}

impl From<&NativeError> for HostError {
    fn from(err: &NativeError) -> Self {
        Self::new(err.message.clone(), err.code.clone())
    }
}

impl From<NativeError> for HostError {
    fn from(err: NativeError) -> Self {
        Self::new(err.message, err.code)
    }
}
