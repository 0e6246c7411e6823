//! Application configuration.
//!
//! Layers, lowest to highest priority:
//! 1. built-in defaults
//! 2. YAML file passed with `--config`
//! 3. environment variables prefixed `SCRIBE__`, nested with `__`
//!    (e.g. `SCRIBE__SERVER__PORT=9000`)
//! 4. CLI overrides (`--port`, `-v`)

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use modkit::StaticConfigProvider;
use modkit::telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};
use shell::RoutesConfig;

pub const ENV_PREFIX: &str = "SCRIBE__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub i18n: I18nConfig,
    pub routes: RoutesConfig,
    /// Raw per-module sections, `modules.<name>.{enabled,config}`.
    pub modules: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit; bounds audio uploads.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct I18nConfig {
    /// Locale used when a request names none and for missing translations.
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
        }
    }
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Fails when `path` is not a file or the merged result does not
    /// deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.port = port;
        }
        self.logging = self.logging.clone().with_verbosity(verbose);
    }

    /// # Errors
    /// Fails if a module section cannot be represented in YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).map_err(|e| anyhow::anyhow!("failed to render config: {e}"))
    }

    /// Module sections as seen by `FeatureModule::register`.
    #[must_use]
    pub fn module_provider(&self) -> StaticConfigProvider {
        StaticConfigProvider::new(
            self.modules
                .iter()
                .map(|(name, section)| (name.clone(), section.clone()))
                .collect(),
        )
    }
}
