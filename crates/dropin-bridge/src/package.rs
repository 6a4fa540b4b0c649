//! Module Package
//!
//! Owns the process-wide [`SessionRegistry`] and builds host modules wired to
//! it. The host runtime may ask for a fresh module at any time; each new one
//! takes over event delivery from its predecessor.

use std::sync::Arc;

use dropin_core::{CheckoutLauncher, SessionRegistry};

use crate::config::BridgeConfig;
use crate::events::{AppContext, EventEmitter, HostContext};
use crate::module::{DropInModule, MODULE_NAME};

pub struct PaymentPackage {
    registry: Arc<SessionRegistry>,
    context: Arc<AppContext>,
}

impl PaymentPackage {
    pub fn new(config: &BridgeConfig) -> Self {
        tracing::debug!(
            package = %config.package_name,
            policy = ?config.delivery_policy,
            "Creating payment package"
        );
        Self {
            registry: Arc::new(SessionRegistry::new(config.delivery_policy)),
            context: Arc::new(AppContext::new(config.package_name.clone())),
        }
    }

    /// Names of the modules this package provides
    pub fn module_names(&self) -> &'static [&'static str] {
        &[MODULE_NAME]
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn context(&self) -> Arc<dyn HostContext> {
        self.context.clone()
    }

    /// Build a drop-in module sharing this package's registry
    pub fn create_drop_in_module(
        &self,
        launcher: Arc<dyn CheckoutLauncher>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Arc<DropInModule> {
        DropInModule::new(self.registry.clone(), launcher, emitter, self.context())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelEmitter;
    use dropin_core::DeliveryPolicy;
    use dropin_core::native::MockDropIn;

    #[test]
    fn test_package_wires_registry_and_context() {
        let config = BridgeConfig {
            package_name: "com.shop.app".into(),
            delivery_policy: DeliveryPolicy::Replay { capacity: 4 },
        };
        let package = PaymentPackage::new(&config);
        assert_eq!(package.module_names(), &["AdyenDropIn"]);
        assert_eq!(package.registry().policy(), DeliveryPolicy::Replay { capacity: 4 });
        assert_eq!(package.context().return_url(), "adyencheckout://com.shop.app");

        let (emitter, _receiver) = ChannelEmitter::new();
        let module = package.create_drop_in_module(Arc::new(MockDropIn::new()), Arc::new(emitter));
        assert_eq!(module.name(), "AdyenDropIn");
        assert!(package.registry().has_event_sink());
    }
}
