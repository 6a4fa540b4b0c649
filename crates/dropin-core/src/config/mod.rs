//! Configuration Parsing
//!
//! Translates the host's untyped configuration tree into the typed
//! configuration the native drop-in expects.
//!
//! ```text
//! {environment, clientKey, locale?, amount?, countryCode?,
//!  dropin?: {...}, card?: {...}, bcmc?: {...}, googlePay?: {...}}
//!        │
//!        ├── RootConfigurationParser      environment, clientKey, locale, amount, countryCode
//!        ├── DropInConfigurationParser    dropin
//!        ├── CardConfigurationParser      card
//!        ├── BcmcConfigurationParser      bcmc
//!        └── GooglePayConfigurationParser googlePay
//! ```
//!
//! Required accessors return [`Result`](crate::Result) and fail with
//! [`CheckoutError::FieldNotFound`](crate::CheckoutError::FieldNotFound).
//! Optional accessors always succeed and fall back to the default documented
//! on each accessor. An absent nested block reads as an empty tree.

mod card;
mod dropin;
mod google_pay;
mod payment_methods;
mod root;

pub use card::{
    AddressVisibility, BcmcConfiguration, BcmcConfigurationParser, CardConfiguration,
    CardConfigurationParser, KcpVisibility,
};
pub use dropin::{DropInConfigurationParser, DropInOptions};
pub use google_pay::{
    GooglePayConfiguration, GooglePayConfigurationParser, GooglePayEnvironment, TotalPriceStatus,
};
pub use payment_methods::{PaymentMethod, PaymentMethodsResponse, StoredPaymentMethod};
pub use root::RootConfigurationParser;

use serde::{Deserialize, Serialize};

use crate::value::HostMap;

static EMPTY_TREE: HostMap = HostMap::new();

/// Resolve a nested block by the first key present, or the empty tree
pub(crate) fn sub_tree<'a>(configuration: &'a HostMap, keys: &[&str]) -> &'a HostMap {
    keys.iter()
        .find_map(|key| configuration.get_map(key))
        .unwrap_or(&EMPTY_TREE)
}

/// Read an enum-like field from its string literal; absent, non-string or
/// unrecognized values resolve to `T::default()`
pub(crate) fn literal_or_default<T: Default>(
    config: &HostMap,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> T {
    let Some(literal) = config.get_string(key) else {
        return T::default();
    };
    parse(literal).unwrap_or_else(|| {
        tracing::debug!(field = key, value = literal, "Unrecognized value, using default");
        T::default()
    })
}

/// Backend environment the drop-in talks to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Test,
    Europe,
    UnitedStates,
    Australia,
    AsiaPacificSouthEast,
    India,
}

impl Environment {
    /// Parse a host literal; unknown literals select the test environment
    pub fn from_literal(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "live" | "live-eu" => Self::Europe,
            "live-us" => Self::UnitedStates,
            "live-au" => Self::Australia,
            "live-apse" => Self::AsiaPacificSouthEast,
            "live-in" => Self::India,
            _ => Self::Test,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Europe => "live-eu",
            Self::UnitedStates => "live-us",
            Self::Australia => "live-au",
            Self::AsiaPacificSouthEast => "live-apse",
            Self::India => "live-in",
        }
    }

    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Test)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shopper locale, e.g. `en-US`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: Option<String>,
}

impl Locale {
    /// Parse `ll`, `ll-CC` or `ll_CC`
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts.next().filter(|l| is_alpha(l, 2..=3))?;
        let country = match parts.next() {
            Some(c) if is_alpha(c, 2..=3) => Some(c.to_uppercase()),
            Some(_) => return None,
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            language: language.to_lowercase(),
            country,
        })
    }
}

fn is_alpha(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

/// Transaction amount in minor units
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: i64,
    pub currency: String,
}

/// Values every component configuration is built from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentContext {
    pub shopper_locale: Option<Locale>,
    pub environment: Environment,
    pub client_key: String,
}

/// 3-D Secure 2 action configuration; it has no host-facing options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDS2Configuration {
    pub context: ComponentContext,
}

impl ThreeDS2Configuration {
    pub const fn new(context: ComponentContext) -> Self {
        Self { context }
    }
}

/// Complete configuration handed to the native drop-in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInConfiguration {
    pub context: ComponentContext,
    pub amount: Option<Amount>,
    pub options: DropInOptions,
    pub card: CardConfiguration,
    pub bcmc: BcmcConfiguration,
    pub three_ds2: ThreeDS2Configuration,
    pub google_pay: Option<GooglePayConfiguration>,
}
