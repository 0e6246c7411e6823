//! Explicit module bootstrap.
//!
//! Each feature crate exports a `FeatureModule`; the application entry point
//! passes them to `bootstrap` in the order it wants them registered.

use anyhow::Context as _;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ConfigProvider;
use crate::context::ModuleCtx;
use crate::manager::ModuleManager;

pub trait FeatureModule: Send + Sync {
    /// Unique module key; also the key of its config section and lang bundle.
    fn name(&self) -> &'static str;

    /// Register components, menus, bundles and services. Runs once, synchronously.
    ///
    /// # Errors
    /// Implementations fail when their configuration is unusable.
    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

/// What happened to each module during `bootstrap`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub registered: Vec<&'static str>,
    pub disabled: Vec<&'static str>,
    pub already_registered: Vec<&'static str>,
}

/// Register `modules` in order.
///
/// Modules disabled in config are skipped, and a module whose name was already
/// registered into this manager is not registered a second time.
///
/// # Errors
/// The first module registration failure, with the module name as context.
pub fn bootstrap(
    manager: &Arc<ModuleManager>,
    config: &Arc<dyn ConfigProvider>,
    modules: &[&dyn FeatureModule],
) -> anyhow::Result<BootstrapReport> {
    let mut report = BootstrapReport::default();

    for module in modules {
        let name = module.name();

        if !config.is_module_enabled(name) {
            info!(module = name, "module disabled by configuration");
            report.disabled.push(name);
            continue;
        }

        if !manager.mark_module(name) {
            debug!(module = name, "module already registered, skipping");
            report.already_registered.push(name);
            continue;
        }

        let ctx = ModuleCtx::new(name, Arc::clone(config), Arc::clone(manager));
        module
            .register(&ctx)
            .with_context(|| format!("failed to register module '{name}'"))?;

        info!(module = name, "module registered");
        report.registered.push(name);
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::component::{View, from_fn};
    use crate::config::StaticConfigProvider;
    use crate::menu::MenuItem;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Demo {
        calls: AtomicUsize,
    }

    impl FeatureModule for Demo {
        fn name(&self) -> &'static str {
            "demo"
        }

        fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ctx.subscribe().app("demo", from_fn(|_| View::new("demo")));
            ctx.subscribe().menu(MenuItem::new("demo-menu", "/demo"));
            Ok(())
        }
    }

    struct Failing;

    impl FeatureModule for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
            #[derive(serde::Deserialize)]
            #[allow(dead_code)]
            struct Needs {
                url: String,
            }
            let _cfg: Needs = ctx.config_required()?;
            Ok(())
        }
    }

    fn provider(value: serde_json::Value) -> Arc<dyn ConfigProvider> {
        let mut p = StaticConfigProvider::default();
        if let Some(obj) = value.as_object() {
            for (k, v) in obj {
                p = p.with_module(k, v.clone());
            }
        }
        Arc::new(p)
    }

    #[test]
    fn modules_register_once() {
        let manager = Arc::new(ModuleManager::new());
        let config = provider(json!({}));
        let demo = Demo::default();

        let first = bootstrap(&manager, &config, &[&demo]).unwrap();
        let second = bootstrap(&manager, &config, &[&demo]).unwrap();

        assert_eq!(first.registered, vec!["demo"]);
        assert_eq!(second.already_registered, vec!["demo"]);
        assert_eq!(demo.calls.load(Ordering::SeqCst), 1);
        assert!(manager.components().app("demo").is_some());
        assert_eq!(manager.modules(), vec!["demo".to_owned()]);
    }

    #[test]
    fn disabled_modules_are_skipped() {
        let manager = Arc::new(ModuleManager::new());
        let config = provider(json!({ "demo": { "enabled": false } }));
        let demo = Demo::default();

        let report = bootstrap(&manager, &config, &[&demo]).unwrap();

        assert_eq!(report.disabled, vec!["demo"]);
        assert!(manager.components().app("demo").is_none());
    }

    #[test]
    fn registration_error_names_the_module() {
        let manager = Arc::new(ModuleManager::new());
        let config = provider(json!({}));

        let err = bootstrap(&manager, &config, &[&Failing]).unwrap_err();
        assert!(err.to_string().contains("failing"));
    }
}
