//! Card and Bancontact Card Configuration

use serde::{Deserialize, Serialize};

use crate::value::HostMap;

use super::{ComponentContext, literal_or_default, sub_tree};

const CARD_KEY: &str = "card";
const BCMC_KEY: &str = "bcmc";
const SHOW_STORE_PAYMENT_FIELD_KEY: &str = "showStorePaymentField";
const HIDE_CVC_STORED_CARD_KEY: &str = "hideCvcStoredCard";
const HIDE_CVC_KEY: &str = "hideCvc";
const HOLDER_NAME_REQUIRED_KEY: &str = "holderNameRequired";
const ADDRESS_VISIBILITY_KEY: &str = "addressVisibility";
const KCP_VISIBILITY_KEY: &str = "kcpVisibility";

/// Which billing address fields the card form shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressVisibility {
    PostalCode,
    Full,
    #[default]
    Hidden,
}

impl AddressVisibility {
    pub fn from_literal(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postalcode" => Some(Self::PostalCode),
            "full" => Some(Self::Full),
            "none" => Some(Self::Hidden),
            _ => None,
        }
    }
}

/// Whether the Korean KCP authentication fields are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KcpVisibility {
    Show,
    #[default]
    Hide,
}

impl KcpVisibility {
    pub fn from_literal(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "show" => Some(Self::Show),
            "hide" => Some(Self::Hide),
            _ => None,
        }
    }
}

/// Reads the `card` block. Every accessor is optional.
pub struct CardConfigurationParser<'a> {
    config: &'a HostMap,
}

impl<'a> CardConfigurationParser<'a> {
    /// Parser over the `card` block of a root configuration
    pub fn new(configuration: &'a HostMap) -> Self {
        Self::from_block(sub_tree(configuration, &[CARD_KEY]))
    }

    /// Parser over an already extracted block
    pub const fn from_block(config: &'a HostMap) -> Self {
        Self { config }
    }

    /// Default `true`.
    pub fn show_store_payment_field(&self) -> bool {
        self.config
            .get_bool(SHOW_STORE_PAYMENT_FIELD_KEY)
            .unwrap_or(true)
    }

    /// Default `false`.
    pub fn hide_cvc_stored_card(&self) -> bool {
        self.config
            .get_bool(HIDE_CVC_STORED_CARD_KEY)
            .unwrap_or(false)
    }

    /// Default `false`.
    pub fn hide_cvc(&self) -> bool {
        self.config.get_bool(HIDE_CVC_KEY).unwrap_or(false)
    }

    /// Default `false`.
    pub fn holder_name_required(&self) -> bool {
        self.config
            .get_bool(HOLDER_NAME_REQUIRED_KEY)
            .unwrap_or(false)
    }

    /// `postalCode`, `full` or `none`. Default [`AddressVisibility::Hidden`].
    pub fn address_visibility(&self) -> AddressVisibility {
        literal_or_default(self.config, ADDRESS_VISIBILITY_KEY, AddressVisibility::from_literal)
    }

    /// `show` or `hide`. Default [`KcpVisibility::Hide`].
    pub fn kcp_visibility(&self) -> KcpVisibility {
        literal_or_default(self.config, KCP_VISIBILITY_KEY, KcpVisibility::from_literal)
    }

    /// Build the card configuration from every accessor
    pub fn configuration(&self, context: &ComponentContext) -> CardConfiguration {
        CardConfiguration {
            context: context.clone(),
            show_store_payment_field: self.show_store_payment_field(),
            hide_cvc_stored_card: self.hide_cvc_stored_card(),
            hide_cvc: self.hide_cvc(),
            holder_name_required: self.holder_name_required(),
            address_visibility: self.address_visibility(),
            kcp_visibility: self.kcp_visibility(),
        }
    }
}

/// Card component configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfiguration {
    pub context: ComponentContext,
    pub show_store_payment_field: bool,
    pub hide_cvc_stored_card: bool,
    pub hide_cvc: bool,
    pub holder_name_required: bool,
    pub address_visibility: AddressVisibility,
    pub kcp_visibility: KcpVisibility,
}

/// Reads the `bcmc` block; an absent block yields all defaults
pub struct BcmcConfigurationParser<'a> {
    config: &'a HostMap,
}

impl<'a> BcmcConfigurationParser<'a> {
    pub fn new(configuration: &'a HostMap) -> Self {
        Self {
            config: sub_tree(configuration, &[BCMC_KEY]),
        }
    }

    /// Default `false`.
    pub fn show_store_payment_field(&self) -> bool {
        self.config
            .get_bool(SHOW_STORE_PAYMENT_FIELD_KEY)
            .unwrap_or(false)
    }

    pub fn configuration(&self, context: &ComponentContext) -> BcmcConfiguration {
        BcmcConfiguration {
            context: context.clone(),
            show_store_payment_field: self.show_store_payment_field(),
        }
    }
}

/// Bancontact card component configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BcmcConfiguration {
    pub context: ComponentContext,
    pub show_store_payment_field: bool,
}
