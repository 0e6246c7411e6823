use std::sync::Arc;

use modkit::{FeatureModule, MenuItem, ModuleCtx};
use templates_sdk::TemplatesService;
use tracing::debug;

use crate::config::TemplatesConfig;
use crate::domain::service::TemplatesDomainService;
use crate::infra::InMemoryTemplatesRepository;
use crate::local_client::TemplatesLocalClient;
use crate::ui;

#[derive(Default)]
pub struct TemplatesModule;

impl FeatureModule for TemplatesModule {
    fn name(&self) -> &'static str {
        "templates"
    }

    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: TemplatesConfig = ctx.config()?;
        debug!(?cfg, "loaded templates config");

        let repo = Arc::new(InMemoryTemplatesRepository::new());
        let service = Arc::new(TemplatesDomainService::new(repo, cfg));

        let subscribe = ctx.subscribe();
        subscribe.service::<TemplatesService>(Arc::new(TemplatesLocalClient::new(service)));
        subscribe.app("templates", Arc::new(ui::TemplatesPage));
        subscribe.menu(
            MenuItem::new("templates:menu", "/app/templates")
                .icon("file-text")
                .order(20),
        );
        subscribe.langs(ctx.module_name(), ui::lang_bundle());
        Ok(())
    }
}
