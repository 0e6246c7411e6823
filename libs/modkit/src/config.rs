//! Typed access to per-module configuration.
//!
//! Module sections live under `modules.<name>` in the application config:
//! ```yaml
//! modules:
//!   templates:
//!     enabled: true
//!     config:
//!       max_name_length: 120
//! ```
//!
//! Two loaders read the `config` object of a section:
//! - `module_config_or_default` falls back to `T::default()` when anything is missing;
//! - `module_config_required` fails instead.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("module '{module}' has no configuration section")]
    ModuleNotFound { module: String },
    #[error("configuration of module '{module}' must be an object")]
    InvalidModuleStructure { module: String },
    #[error("module '{module}' has no 'config' object")]
    MissingConfigSection { module: String },
    #[error("invalid config for module '{module}': {source}")]
    InvalidConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw per-module sections.
pub trait ConfigProvider: Send + Sync {
    /// Raw JSON section of `modules.<module_name>`, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;

    /// A module is enabled unless its section says `enabled: false`.
    fn is_module_enabled(&self, module_name: &str) -> bool {
        self.get_module_config(module_name)
            .and_then(|section| section.get("enabled"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true)
    }
}

/// In-memory provider over a `name -> section` map.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    modules: HashMap<String, serde_json::Value>,
}

impl StaticConfigProvider {
    #[must_use]
    pub fn new(modules: HashMap<String, serde_json::Value>) -> Self {
        Self { modules }
    }

    #[must_use]
    pub fn with_module(mut self, name: &str, section: serde_json::Value) -> Self {
        self.modules.insert(name.to_owned(), section);
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}

/// Lenient loader.
///
/// Missing section, non-object section or missing `config` all yield
/// `T::default()`; only a present-but-invalid `config` is an error.
///
/// # Errors
/// `ConfigError::InvalidConfig` when the `config` object does not deserialize into `T`.
pub fn module_config_or_default<T: DeserializeOwned + Default>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let Some(section) = provider
        .get_module_config(module_name)
        .and_then(serde_json::Value::as_object)
        .and_then(|obj| obj.get("config"))
    else {
        return Ok(T::default());
    };

    parse(module_name, section)
}

/// Strict loader.
///
/// # Errors
/// `ModuleNotFound`, `InvalidModuleStructure`, `MissingConfigSection` or
/// `InvalidConfig`, depending on what is wrong with the section.
pub fn module_config_required<T: DeserializeOwned>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let raw = provider
        .get_module_config(module_name)
        .ok_or_else(|| ConfigError::ModuleNotFound {
            module: module_name.to_owned(),
        })?;

    let obj = raw
        .as_object()
        .ok_or_else(|| ConfigError::InvalidModuleStructure {
            module: module_name.to_owned(),
        })?;

    let section = obj
        .get("config")
        .ok_or_else(|| ConfigError::MissingConfigSection {
            module: module_name.to_owned(),
        })?;

    parse(module_name, section)
}

fn parse<T: DeserializeOwned>(module_name: &str, section: &serde_json::Value) -> Result<T, ConfigError> {
    serde_json::from_value(section.clone()).map_err(|source| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source,
    })
}
