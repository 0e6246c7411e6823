//! Module declaration for the auth module.

use std::sync::Arc;

use auth_sdk::OAuthService;
use modkit::{FeatureModule, MenuItem, ModuleCtx, from_fn};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::domain::service::AuthService;
use crate::local_client::AuthLocalClient;
use crate::ui;

/// Registers the `oauth` service, `/auth/*` pages and the account settings page.
#[derive(Default)]
pub struct AuthModule;

impl FeatureModule for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: AuthConfig = ctx.config()?;
        debug!(
            session_ttl_secs = cfg.session_ttl_secs,
            providers = cfg.oauth.len(),
            "loaded auth config"
        );

        let service = Arc::new(AuthService::new(cfg));
        let seeded = service.seed()?;

        let subscribe = ctx.subscribe();
        subscribe.service::<OAuthService>(Arc::new(AuthLocalClient::new(service)));

        subscribe.auth("login", from_fn(ui::login));
        subscribe.auth("register", from_fn(ui::register));
        subscribe.auth("reset-password", from_fn(ui::reset_password));
        subscribe.auth("confirm-email", Arc::new(ui::ConfirmEmail));

        subscribe.settings("account", from_fn(ui::account));
        subscribe.menu_settings(
            MenuItem::new("auth:menu.account", "/settings/account")
                .icon("user")
                .order(0),
        );
        subscribe.langs(ctx.module_name(), ui::lang_bundle());

        info!(seeded, "auth module registered");
        Ok(())
    }
}
