use std::sync::Arc;

use modkit::{FeatureModule, MenuItem, ModuleCtx};
use recording_sdk::MedicalApiService;
use tracing::{debug, info};

use crate::config::RecordingConfig;
use crate::infra::MedicalHttpClient;
use crate::ui;

#[derive(Default)]
pub struct RecordingModule;

impl FeatureModule for RecordingModule {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: RecordingConfig = ctx.config()?;
        debug!(base_url = %cfg.base_url, timeout_secs = cfg.timeout_secs, "loaded recording config");

        let client = MedicalHttpClient::new(&cfg)?;
        info!(base_url = %cfg.base_url, "medical API client ready");

        let subscribe = ctx.subscribe();
        subscribe.service::<MedicalApiService>(Arc::new(client));
        subscribe.app("recording", Arc::new(ui::RecordingPage));
        subscribe.menu(
            MenuItem::new("recording:menu", "/app/recording")
                .icon("mic")
                .order(10),
        );
        subscribe.langs(ctx.module_name(), ui::lang_bundle());
        Ok(())
    }
}
