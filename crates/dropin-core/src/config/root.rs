//! Root Configuration

use crate::error::{CheckoutError, Result};
use crate::value::HostMap;

use super::{Amount, Environment, Locale};

const ENVIRONMENT_KEY: &str = "environment";
const CLIENT_KEY_KEY: &str = "clientKey";
const LOCALE_KEY: &str = "locale";
const SHOPPER_LOCALE_KEY: &str = "shopperLocale";
const AMOUNT_KEY: &str = "amount";
const AMOUNT_VALUE_KEY: &str = "value";
const AMOUNT_CURRENCY_KEY: &str = "currency";
const COUNTRY_CODE_KEY: &str = "countryCode";

/// Reads the top-level fields of a configuration tree
pub struct RootConfigurationParser<'a> {
    config: &'a HostMap,
}

impl<'a> RootConfigurationParser<'a> {
    pub const fn new(config: &'a HostMap) -> Self {
        Self { config }
    }

    /// Required. Unknown literals resolve to [`Environment::Test`].
    pub fn environment(&self) -> Result<Environment> {
        self.required_string(ENVIRONMENT_KEY)
            .map(Environment::from_literal)
    }

    /// Required.
    pub fn client_key(&self) -> Result<String> {
        self.required_string(CLIENT_KEY_KEY).map(str::to_string)
    }

    /// `locale`, falling back to `shopperLocale`. Fails when neither holds a
    /// well-formed tag; callers treat that as "keep the native default".
    pub fn locale(&self) -> Result<Locale> {
        self.config
            .get_string(LOCALE_KEY)
            .or_else(|| self.config.get_string(SHOPPER_LOCALE_KEY))
            .and_then(Locale::parse)
            .ok_or_else(|| CheckoutError::FieldNotFound(LOCALE_KEY.into()))
    }

    /// Optional. `None` when absent or when `value`/`currency` are malformed.
    pub fn amount(&self) -> Option<Amount> {
        let amount = self.config.get_map(AMOUNT_KEY)?;
        let value = amount.get_int(AMOUNT_VALUE_KEY);
        let currency = amount
            .get_string(AMOUNT_CURRENCY_KEY)
            .filter(|c| !c.is_empty());

        match (value, currency) {
            (Some(value), Some(currency)) => Some(Amount {
                value,
                currency: currency.to_uppercase(),
            }),
            _ => {
                tracing::debug!("Ignoring malformed `amount` in configuration");
                None
            }
        }
    }

    /// Required for wallet configuration only.
    pub fn country_code(&self) -> Result<String> {
        self.required_string(COUNTRY_CODE_KEY)
            .map(str::to_uppercase)
    }

    fn required_string(&self, key: &str) -> Result<&'a str> {
        self.config
            .get_string(key)
            .ok_or_else(|| CheckoutError::FieldNotFound(key.into()))
    }
}
