use std::sync::Arc;

use modkit::{ConfigProvider, FeatureModule, ModuleManager, bootstrap};
use shell::RoutesConfig;
use tracing::info;

use crate::config::AppConfig;
use crate::registered_modules;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ModuleManager>,
    pub routes: Arc<RoutesConfig>,
    pub max_body_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(manager: Arc<ModuleManager>, routes: RoutesConfig, max_body_bytes: usize) -> Self {
        Self {
            manager,
            routes: Arc::new(routes),
            max_body_bytes,
        }
    }

    /// Build a manager and register every compiled-in module against `config`.
    ///
    /// # Errors
    /// Fails when a module rejects its configuration.
    pub fn bootstrap(config: &AppConfig) -> anyhow::Result<Self> {
        let manager = Arc::new(ModuleManager::with_default_locale(
            config.i18n.default_locale.as_str(),
        ));
        let provider: Arc<dyn ConfigProvider> = Arc::new(config.module_provider());

        let modules = registered_modules::all();
        let refs: Vec<&dyn FeatureModule> = modules.iter().map(AsRef::as_ref).collect();
        let report = bootstrap(&manager, &provider, &refs)?;
        info!(
            registered = ?report.registered,
            disabled = ?report.disabled,
            "modules bootstrapped"
        );

        Ok(Self::new(
            manager,
            config.routes.clone(),
            config.server.max_body_bytes,
        ))
    }
}
