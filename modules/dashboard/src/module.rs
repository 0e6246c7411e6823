use std::sync::Arc;

use modkit::{FeatureModule, MenuItem, ModuleCtx};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::ui;

/// Slug of the landing page under `/app`.
pub const SLUG: &str = "dashboard";

#[derive(Default)]
pub struct DashboardModule;

impl FeatureModule for DashboardModule {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: DashboardConfig = ctx.config()?;
        debug!(?cfg, "loaded dashboard config");

        let subscribe = ctx.subscribe();
        subscribe.app(SLUG, Arc::new(ui::DashboardPage::new(cfg)));
        subscribe.menu(
            MenuItem::new("dashboard:menu", "/app/dashboard")
                .icon("home")
                .order(0),
        );
        subscribe.langs(ctx.module_name(), ui::lang_bundle());
        Ok(())
    }
}
