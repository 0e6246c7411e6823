use async_trait::async_trait;
use modkit::menu::sort_by_order;
use modkit::{Component, LangBundle, RenderCtx, View, escape_html, page};
use subscriptions_sdk::{SubscriptionStatus, SubscriptionsService};

use crate::config::DashboardConfig;

pub struct DashboardPage {
    config: DashboardConfig,
}

impl DashboardPage {
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Component for DashboardPage {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        let mut parts = Vec::new();

        if let Some(security) = ctx.security {
            parts.push(format!(
                r#"<p class="greeting">{} {}</p>"#,
                escape_html(ctx.t("dashboard:welcome")),
                escape_html(security.email())
            ));
        }

        if self.config.show_subscription {
            parts.push(subscription_block(ctx).await);
        }

        let mut items = ctx.components().menus();
        items.retain(|item| item.url != "/app/dashboard");
        sort_by_order(&mut items);
        let shortcuts: String = items
            .iter()
            .take(self.config.max_shortcuts)
            .map(|item| {
                format!(
                    r#"<li><a href="{}" data-icon="{}">{}</a></li>"#,
                    escape_html(&item.url),
                    escape_html(&item.icon),
                    escape_html(ctx.t(&item.label))
                )
            })
            .collect();
        if !shortcuts.is_empty() {
            parts.push(format!(r#"<ul class="shortcuts">{shortcuts}</ul>"#));
        }

        page(ctx.t("dashboard:title"), &parts.concat())
    }
}

/// Empty unless a user is signed in and the subscriptions service is present.
async fn subscription_block(ctx: &RenderCtx<'_>) -> String {
    let (Some(security), Some(subscriptions)) = (
        ctx.security,
        ctx.components().services::<SubscriptionsService>(),
    ) else {
        return String::new();
    };

    match subscriptions.get_active_subscription(security).await {
        Ok(status) => status_line(ctx, status.as_ref()),
        Err(err) => {
            tracing::warn!(error = %err, "subscription state unavailable for dashboard");
            String::new()
        }
    }
}

fn status_line(ctx: &RenderCtx<'_>, status: Option<&SubscriptionStatus>) -> String {
    let (state, label) = match status {
        Some(s) => (s.status.as_str(), ctx.t("dashboard:plan.current")),
        None => ("none", ctx.t("dashboard:plan.none")),
    };
    format!(
        r#"<p class="plan" data-status="{state}"><a href="/app/subscriptions">{}</a></p>"#,
        escape_html(label)
    )
}

pub fn lang_bundle() -> LangBundle {
    LangBundle::new()
        .locale(
            "en",
            [
                ("title", "Dashboard"),
                ("menu", "Dashboard"),
                ("welcome", "Welcome,"),
                ("plan.current", "Manage your subscription"),
                ("plan.none", "Choose a plan"),
            ],
        )
        .locale(
            "fr",
            [
                ("title", "Tableau de bord"),
                ("menu", "Tableau de bord"),
                ("welcome", "Bienvenue,"),
                ("plan.current", "G\u{e9}rer votre abonnement"),
                ("plan.none", "Choisir une offre"),
            ],
        )
}
