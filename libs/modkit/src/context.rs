use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::{ConfigError, ConfigProvider, module_config_or_default, module_config_required};
use crate::manager::{Components, ModuleManager, Subscribe};

/// Registration context handed to each feature module during bootstrap.
///
/// Gives a module its own config section and the manager's subscribe surface:
/// ```ignore
/// fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
///     let cfg: TemplatesConfig = ctx.config()?;
///     ctx.subscribe().service::<TemplatesService>(Arc::new(LocalClient::new(cfg)));
///     ctx.subscribe().app("templates", from_fn(render_templates));
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ModuleCtx {
    module_name: Arc<str>,
    config_provider: Arc<dyn ConfigProvider>,
    manager: Arc<ModuleManager>,
}

impl ModuleCtx {
    pub fn new(
        module_name: impl Into<Arc<str>>,
        config_provider: Arc<dyn ConfigProvider>,
        manager: Arc<ModuleManager>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            config_provider,
            manager,
        }
    }

    #[inline]
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[inline]
    #[must_use]
    pub fn config_provider(&self) -> &dyn ConfigProvider {
        &*self.config_provider
    }

    /// Typed `modules.<name>.config`, falling back to `T::default()`.
    ///
    /// # Errors
    /// `ConfigError::InvalidConfig` when the section is present but malformed.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        module_config_or_default(self.config_provider.as_ref(), &self.module_name)
    }

    /// Typed `modules.<name>.config` that must be present.
    ///
    /// # Errors
    /// Any `ConfigError` describing the missing or malformed section.
    pub fn config_required<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        module_config_required(self.config_provider.as_ref(), &self.module_name)
    }

    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> Subscribe<'_> {
        self.manager.subscribe()
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> Components<'_> {
        self.manager.components()
    }

    #[inline]
    #[must_use]
    pub fn manager(&self) -> &Arc<ModuleManager> {
        &self.manager
    }
}
