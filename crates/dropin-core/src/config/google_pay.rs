//! Google Pay Configuration

use serde::{Deserialize, Serialize};

use crate::value::{HostMap, HostValue};

use super::{Amount, ComponentContext, Environment, literal_or_default, sub_tree};

const GOOGLE_PAY_KEYS: [&str; 2] = ["googlePay", "googlepay"];
const MERCHANT_ACCOUNT_KEY: &str = "merchantAccount";
const ALLOWED_CARD_NETWORKS_KEY: &str = "allowedCardNetworks";
const ALLOWED_AUTH_METHODS_KEY: &str = "allowedAuthMethods";
const ALLOW_PREPAID_CARDS_KEY: &str = "allowPrepaidCards";
const BILLING_ADDRESS_REQUIRED_KEY: &str = "billingAddressRequired";
const EMAIL_REQUIRED_KEY: &str = "emailRequired";
const SHIPPING_ADDRESS_REQUIRED_KEY: &str = "shippingAddressRequired";
const EXISTING_PAYMENT_METHOD_REQUIRED_KEY: &str = "existingPaymentMethodRequired";
const GOOGLE_PAY_ENVIRONMENT_KEY: &str = "googlePayEnvironment";
const TOTAL_PRICE_STATUS_KEY: &str = "totalPriceStatus";

/// Google Pay wallet environment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GooglePayEnvironment {
    Test,
    Production,
}

impl GooglePayEnvironment {
    pub fn from_literal(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "test" => Some(Self::Test),
            "production" | "live" => Some(Self::Production),
            _ => None,
        }
    }

    /// Wallet environment that pairs with a backend environment
    pub const fn for_environment(environment: Environment) -> Self {
        if environment.is_live() {
            Self::Production
        } else {
            Self::Test
        }
    }
}

/// Status of the total price shown on the Google Pay sheet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalPriceStatus {
    NotCurrentlyKnown,
    Estimated,
    #[default]
    Final,
}

impl TotalPriceStatus {
    pub fn from_literal(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NOT_CURRENTLY_KNOWN" => Some(Self::NotCurrentlyKnown),
            "ESTIMATED" => Some(Self::Estimated),
            "FINAL" => Some(Self::Final),
            _ => None,
        }
    }
}

/// Reads the `googlePay` block (`googlepay` is accepted too)
pub struct GooglePayConfigurationParser<'a> {
    config: &'a HostMap,
}

impl<'a> GooglePayConfigurationParser<'a> {
    pub fn new(configuration: &'a HostMap) -> Self {
        Self {
            config: sub_tree(configuration, &GOOGLE_PAY_KEYS),
        }
    }

    /// Default `None`.
    pub fn merchant_account(&self) -> Option<String> {
        self.config
            .get_string(MERCHANT_ACCOUNT_KEY)
            .map(str::to_string)
    }

    /// Default empty, meaning the native default set. Non-string entries are skipped.
    pub fn allowed_card_networks(&self) -> Vec<String> {
        self.string_list(ALLOWED_CARD_NETWORKS_KEY)
            .into_iter()
            .map(|network| network.to_uppercase())
            .collect()
    }

    /// Default empty, meaning the native default set.
    pub fn allowed_auth_methods(&self) -> Vec<String> {
        self.string_list(ALLOWED_AUTH_METHODS_KEY)
    }

    /// Default `false`.
    pub fn allow_prepaid_cards(&self) -> bool {
        self.flag(ALLOW_PREPAID_CARDS_KEY)
    }

    /// Default `false`.
    pub fn billing_address_required(&self) -> bool {
        self.flag(BILLING_ADDRESS_REQUIRED_KEY)
    }

    /// Default `false`.
    pub fn email_required(&self) -> bool {
        self.flag(EMAIL_REQUIRED_KEY)
    }

    /// Default `false`.
    pub fn shipping_address_required(&self) -> bool {
        self.flag(SHIPPING_ADDRESS_REQUIRED_KEY)
    }

    /// Default `false`.
    pub fn existing_payment_method_required(&self) -> bool {
        self.flag(EXISTING_PAYMENT_METHOD_REQUIRED_KEY)
    }

    /// `test` or `production`. Absent or unknown literals pair with the
    /// backend environment: test backend → test wallet, live → production.
    pub fn google_pay_environment(&self, environment: Environment) -> GooglePayEnvironment {
        self.config
            .get_string(GOOGLE_PAY_ENVIRONMENT_KEY)
            .and_then(GooglePayEnvironment::from_literal)
            .unwrap_or_else(|| GooglePayEnvironment::for_environment(environment))
    }

    /// Default [`TotalPriceStatus::Final`].
    pub fn total_price_status(&self) -> TotalPriceStatus {
        literal_or_default(self.config, TOTAL_PRICE_STATUS_KEY, TotalPriceStatus::from_literal)
    }

    pub fn configuration(
        &self,
        context: &ComponentContext,
        country_code: String,
        amount: Amount,
    ) -> GooglePayConfiguration {
        GooglePayConfiguration {
            context: context.clone(),
            country_code,
            amount,
            merchant_account: self.merchant_account(),
            allowed_card_networks: self.allowed_card_networks(),
            allowed_auth_methods: self.allowed_auth_methods(),
            allow_prepaid_cards: self.allow_prepaid_cards(),
            billing_address_required: self.billing_address_required(),
            email_required: self.email_required(),
            shipping_address_required: self.shipping_address_required(),
            existing_payment_method_required: self.existing_payment_method_required(),
            google_pay_environment: self.google_pay_environment(context.environment),
            total_price_status: self.total_price_status(),
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.config.get_bool(key).unwrap_or(false)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.config
            .get_array(key)
            .unwrap_or_default()
            .iter()
            .filter_map(HostValue::as_str)
            .map(str::to_string)
            .collect()
    }
}

/// Google Pay component configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GooglePayConfiguration {
    pub context: ComponentContext,
    pub country_code: String,
    pub amount: Amount,
    pub merchant_account: Option<String>,
    pub allowed_card_networks: Vec<String>,
    pub allowed_auth_methods: Vec<String>,
    pub allow_prepaid_cards: bool,
    pub billing_address_required: bool,
    pub email_required: bool,
    pub shipping_address_required: bool,
    pub existing_payment_method_required: bool,
    pub google_pay_environment: GooglePayEnvironment,
    pub total_price_status: TotalPriceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::json_to_map;
    use serde_json::json;

    fn context(environment: Environment) -> ComponentContext {
        ComponentContext {
            shopper_locale: None,
            environment,
            client_key: "k1".into(),
        }
    }

    fn amount() -> Amount {
        Amount {
            value: 1000,
            currency: "EUR".into(),
        }
    }

    #[test]
    fn test_defaults_against_empty_tree() {
        let config = HostMap::new();
        let google_pay = GooglePayConfigurationParser::new(&config).configuration(
            &context(Environment::Test),
            "NL".into(),
            amount(),
        );

        assert_eq!(google_pay.merchant_account, None);
        assert!(google_pay.allowed_card_networks.is_empty());
        assert!(google_pay.allowed_auth_methods.is_empty());
        assert!(!google_pay.allow_prepaid_cards);
        assert!(!google_pay.billing_address_required);
        assert!(!google_pay.email_required);
        assert!(!google_pay.shipping_address_required);
        assert!(!google_pay.existing_payment_method_required);
        assert_eq!(google_pay.google_pay_environment, GooglePayEnvironment::Test);
        assert_eq!(google_pay.total_price_status, TotalPriceStatus::Final);
        assert_eq!(google_pay.country_code, "NL");
    }

    #[test]
    fn test_environment_follows_backend_when_unset() {
        let config = HostMap::new();
        let parser = GooglePayConfigurationParser::new(&config);
        assert_eq!(
            parser.google_pay_environment(Environment::Europe),
            GooglePayEnvironment::Production
        );

        let config = json_to_map(&json!({ "googlePay": { "googlePayEnvironment": "mars" } })).unwrap();
        let parser = GooglePayConfigurationParser::new(&config);
        assert_eq!(
            parser.google_pay_environment(Environment::Test),
            GooglePayEnvironment::Test
        );
    }

    #[test]
    fn test_values() {
        let config = json_to_map(&json!({
            "googlepay": {
                "merchantAccount": "Shop",
                "allowedCardNetworks": ["visa", "mastercard", 7],
                "allowedAuthMethods": ["PAN_ONLY"],
                "allowPrepaidCards": true,
                "emailRequired": true,
                "googlePayEnvironment": "production",
                "totalPriceStatus": "estimated"
            }
        }))
        .unwrap();
        let parser = GooglePayConfigurationParser::new(&config);

        assert_eq!(parser.merchant_account().as_deref(), Some("Shop"));
        assert_eq!(parser.allowed_card_networks(), vec!["VISA", "MASTERCARD"]);
        assert_eq!(parser.allowed_auth_methods(), vec!["PAN_ONLY"]);
        assert!(parser.allow_prepaid_cards());
        assert!(parser.email_required());
        assert!(!parser.billing_address_required());
        assert_eq!(
            parser.google_pay_environment(Environment::Test),
            GooglePayEnvironment::Production
        );
        assert_eq!(parser.total_price_status(), TotalPriceStatus::Estimated);
    }

    #[test]
    fn test_unknown_total_price_status_falls_back() {
        let config =
            json_to_map(&json!({ "googlePay": { "totalPriceStatus": "SOMETIMES" } })).unwrap();
        assert_eq!(
            GooglePayConfigurationParser::new(&config).total_price_status(),
            TotalPriceStatus::Final
        );
    }
}
