use std::sync::Arc;

use modkit::{FeatureModule, MenuItem, ModuleCtx};
use subscriptions_sdk::SubscriptionsService;
use tracing::info;

use crate::config::SubscriptionsConfig;
use crate::domain::service::BillingService;
use crate::local_client::SubscriptionsLocalClient;
use crate::ui;

/// Registers the `subscriptions` service and the `/app/subscriptions` page.
#[derive(Default)]
pub struct SubscriptionsModule {
    billing: parking_lot::Mutex<Option<Arc<BillingService>>>,
}

impl SubscriptionsModule {
    /// Billing state created by `register`, for webhooks and seeding.
    #[must_use]
    pub fn billing(&self) -> Option<Arc<BillingService>> {
        self.billing.lock().clone()
    }
}

impl FeatureModule for SubscriptionsModule {
    fn name(&self) -> &'static str {
        "subscriptions"
    }

    fn register(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: SubscriptionsConfig = ctx.config()?;
        url::Url::parse(&cfg.checkout_url)
            .map_err(|e| anyhow::anyhow!("invalid checkout_url '{}': {e}", cfg.checkout_url))?;
        info!(
            period_days = cfg.period_days,
            trial_days = cfg.trial_days,
            "loaded subscriptions config"
        );

        let billing = Arc::new(BillingService::new(cfg));
        *self.billing.lock() = Some(Arc::clone(&billing));

        let subscribe = ctx.subscribe();
        subscribe.service::<SubscriptionsService>(Arc::new(SubscriptionsLocalClient::new(billing)));
        subscribe.app("subscriptions", Arc::new(ui::SubscriptionPage));
        subscribe.menu(
            MenuItem::new("subscriptions:menu", "/app/subscriptions")
                .icon("credit-card")
                .order(90),
        );
        subscribe.langs(ctx.module_name(), ui::lang_bundle());
        Ok(())
    }
}
