//! Host State

use std::sync::Arc;

use dropin_bridge::{BridgeConfig, ChannelEmitter, DropInModule, PaymentPackage};
use dropin_core::native::MockDropIn;

/// Everything the command loop needs between lines
pub struct AppState {
    /// Package owning the session registry
    pub package: PaymentPackage,

    /// Native drop-in stand-in
    pub launcher: Arc<MockDropIn>,

    /// Shared by every module instance, so events keep flowing to stdout
    pub emitter: Arc<ChannelEmitter>,

    /// Module the host currently talks to
    pub module: Arc<DropInModule>,
}

impl AppState {
    pub fn new(config: &BridgeConfig, launcher: Arc<MockDropIn>, emitter: ChannelEmitter) -> Self {
        let package = PaymentPackage::new(config);
        let emitter = Arc::new(emitter);
        let module = package.create_drop_in_module(launcher.clone(), emitter.clone());

        Self {
            package,
            launcher,
            emitter,
            module,
        }
    }

    /// Replace the module the way a host runtime reload would
    pub fn reload_module(&mut self) {
        self.module = self
            .package
            .create_drop_in_module(self.launcher.clone(), self.emitter.clone());
        tracing::info!(
            session = ?self.package.registry().active_session().map(|s| s.id),
            "Module reloaded"
        );
    }
}
