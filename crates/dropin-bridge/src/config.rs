//! Bridge Configuration

use serde::{Deserialize, Serialize};

use dropin_core::{CheckoutError, DeliveryPolicy, Result};

const PACKAGE_NAME_VAR: &str = "DROPIN_PACKAGE_NAME";
const REPLAY_CAPACITY_VAR: &str = "DROPIN_REPLAY_CAPACITY";

/// Process-level settings for the bridge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Application identifier; the redirect return URL is derived from it
    pub package_name: String,

    /// Fate of native events that arrive while no module is registered
    #[serde(default)]
    pub delivery_policy: DeliveryPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            package_name: "com.example.checkout".into(),
            delivery_policy: DeliveryPolicy::Drop,
        }
    }
}

impl BridgeConfig {
    /// Create from environment variables
    ///
    /// `DROPIN_PACKAGE_NAME` overrides the package name. A positive
    /// `DROPIN_REPLAY_CAPACITY` switches to the replay policy; `0` or unset
    /// keeps the drop policy.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(package_name) = lookup(PACKAGE_NAME_VAR).filter(|p| !p.trim().is_empty()) {
            config.package_name = package_name.trim().to_string();
        }

        if let Some(raw) = lookup(REPLAY_CAPACITY_VAR) {
            let capacity: usize = raw.trim().parse().map_err(|_| {
                CheckoutError::Config(format!("{REPLAY_CAPACITY_VAR} must be a number, got {raw:?}"))
            })?;
            if capacity > 0 {
                config.delivery_policy = DeliveryPolicy::Replay { capacity };
            }
        }

        Ok(config)
    }
}
