//! Payment Methods Descriptor
//!
//! The `/paymentMethods` response the host fetched from its server, in the
//! shape the native drop-in consumes.

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::value::{HostMap, map_to_json};

/// A payment method offered to the shopper
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,

    /// Remaining method-specific fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A payment method the shopper stored earlier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPaymentMethod {
    pub id: String,

    #[serde(rename = "type")]
    pub method_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    pub payment_methods: Vec<PaymentMethod>,

    #[serde(default)]
    pub stored_payment_methods: Vec<StoredPaymentMethod>,
}

impl PaymentMethodsResponse {
    /// Parse the host descriptor; any structural problem is reported as
    /// [`CheckoutError::InvalidPaymentMethods`]
    pub fn from_host(descriptor: &HostMap) -> Result<Self> {
        let json = map_to_json(descriptor)
            .map_err(|e| CheckoutError::InvalidPaymentMethods(e.to_string()))?;
        serde_json::from_value(json).map_err(|e| CheckoutError::InvalidPaymentMethods(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.payment_methods.is_empty() && self.stored_payment_methods.is_empty()
    }

    /// Types of all offered methods, stored ones first
    pub fn method_types(&self) -> Vec<&str> {
        self.stored_payment_methods
            .iter()
            .map(|m| m.method_type.as_str())
            .chain(self.payment_methods.iter().map(|m| m.method_type.as_str()))
            .collect()
    }
}
