//! Drop-in Display Options

use serde::{Deserialize, Serialize};

use crate::value::HostMap;

use super::sub_tree;

const DROPIN_KEY: &str = "dropin";
const SHOW_PRESELECTED_KEY: &str = "showPreselectedStoredPaymentMethod";
const SKIP_LIST_KEY: &str = "skipListWhenSinglePaymentMethod";

/// Reads the `dropin` block
pub struct DropInConfigurationParser<'a> {
    config: &'a HostMap,
}

impl<'a> DropInConfigurationParser<'a> {
    pub fn new(configuration: &'a HostMap) -> Self {
        Self {
            config: sub_tree(configuration, &[DROPIN_KEY]),
        }
    }

    /// Default `true`.
    pub fn show_preselected_stored_payment_method(&self) -> bool {
        self.config.get_bool(SHOW_PRESELECTED_KEY).unwrap_or(true)
    }

    /// Default `false`.
    pub fn skip_list_when_single_payment_method(&self) -> bool {
        self.config.get_bool(SKIP_LIST_KEY).unwrap_or(false)
    }

    pub fn options(&self) -> DropInOptions {
        DropInOptions {
            show_preselected_stored_payment_method: self.show_preselected_stored_payment_method(),
            skip_list_when_single_payment_method: self.skip_list_when_single_payment_method(),
        }
    }
}

/// How the drop-in list is presented
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInOptions {
    pub show_preselected_stored_payment_method: bool,
    pub skip_list_when_single_payment_method: bool,
}

impl Default for DropInOptions {
    fn default() -> Self {
        DropInConfigurationParser::new(&HostMap::new()).options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::json_to_map;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = DropInOptions::default();
        assert!(options.show_preselected_stored_payment_method);
        assert!(!options.skip_list_when_single_payment_method);
    }

    #[test]
    fn test_values() {
        let config = json_to_map(&json!({
            "dropin": {
                "skipListWhenSinglePaymentMethod": true,
                "showPreselectedStoredPaymentMethod": false
            }
        }))
        .unwrap();
        let options = DropInConfigurationParser::new(&config).options();
        assert!(!options.show_preselected_stored_payment_method);
        assert!(options.skip_list_when_single_payment_method);
    }
}
