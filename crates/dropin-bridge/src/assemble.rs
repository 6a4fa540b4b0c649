//! Configuration Assembly
//!
//! Folds every parser into one [`DropInConfiguration`]. Only the environment
//! and client key can abort; each other step either has full defaults or is
//! skipped with a debug log.

use dropin_core::config::{
    Amount, BcmcConfigurationParser, CardConfigurationParser, ComponentContext,
    DropInConfigurationParser, GooglePayConfiguration, GooglePayConfigurationParser,
    RootConfigurationParser, ThreeDS2Configuration,
};
use dropin_core::{DropInConfiguration, HostMap, Result};

/// Build the native configuration from the host configuration tree
pub fn drop_in_configuration(configuration: &HostMap) -> Result<DropInConfiguration> {
    let root = RootConfigurationParser::new(configuration);
    let environment = root.environment()?;
    let client_key = root.client_key()?;

    let shopper_locale = match root.locale() {
        Ok(locale) => Some(locale),
        Err(e) => {
            tracing::debug!(reason = %e, "Keeping the drop-in's default locale");
            None
        }
    };

    let context = ComponentContext {
        shopper_locale,
        environment,
        client_key,
    };

    let amount = root.amount();
    let google_pay = amount
        .as_ref()
        .and_then(|amount| google_pay_configuration(&root, configuration, &context, amount));

    Ok(DropInConfiguration {
        options: DropInConfigurationParser::new(configuration).options(),
        card: CardConfigurationParser::new(configuration).configuration(&context),
        bcmc: BcmcConfigurationParser::new(configuration).configuration(&context),
        three_ds2: ThreeDS2Configuration::new(context.clone()),
        google_pay,
        amount,
        context,
    })
}

fn google_pay_configuration(
    root: &RootConfigurationParser<'_>,
    configuration: &HostMap,
    context: &ComponentContext,
    amount: &Amount,
) -> Option<GooglePayConfiguration> {
    match root.country_code() {
        Ok(country_code) => Some(
            GooglePayConfigurationParser::new(configuration).configuration(
                context,
                country_code,
                amount.clone(),
            ),
        ),
        Err(_) => {
            tracing::debug!("Can't configure Google Pay: no `countryCode` in configuration");
            None
        }
    }
}
