//! `/app/subscriptions` page.

use async_trait::async_trait;
use modkit::{Component, LangBundle, RenderCtx, View, escape_html, page};
use subscriptions_sdk::{Invoice, InvoiceRange, SubscriptionStatus, SubscriptionsService};

pub struct SubscriptionPage;

#[async_trait]
impl Component for SubscriptionPage {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        let title = ctx.t("subscriptions:title");
        let (Some(security), Some(api)) = (
            ctx.security,
            ctx.components().services::<SubscriptionsService>(),
        ) else {
            return page(title, "");
        };

        let status = match api.get_active_subscription(security).await {
            Ok(status) => status,
            Err(err) => {
                ctx.notifier.error(&err.to_string());
                None
            }
        };

        let mut parts = vec![status_block(ctx, status.as_ref())];

        match api.get_subscription_link(security).await {
            Ok(link) => parts.push(format!(
                r#"<p><a class="button" href="{}">{}</a></p>"#,
                escape_html(&link.url),
                escape_html(ctx.t("subscriptions:subscribe")),
            )),
            Err(err) => ctx.notifier.error(&err.to_string()),
        }

        if status.as_ref().is_some_and(|s| !s.cancel_at_period_end) {
            parts.push(format!(
                r#"<form method="post" action="/app/subscriptions/cancel"><button type="submit">{}</button></form>"#,
                escape_html(ctx.t("subscriptions:cancel")),
            ));
        }

        match api.get_invoices(security, InvoiceRange::all()).await {
            Ok(invoices) => parts.push(invoice_table(ctx, &invoices)),
            Err(err) => ctx.notifier.error(&err.to_string()),
        }

        page(title, &parts.concat())
    }
}

fn status_block(ctx: &RenderCtx<'_>, status: Option<&SubscriptionStatus>) -> String {
    let Some(status) = status else {
        return format!("<p>{}</p>", escape_html(ctx.t("subscriptions:none")));
    };
    let until = status
        .current_period_end
        .map(|end| end.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        r#"<p class="status" data-status="{state}">{label}: {state} {until}</p>"#,
        state = status.status.as_str(),
        label = escape_html(ctx.t("subscriptions:status")),
    )
}

fn invoice_table(ctx: &RenderCtx<'_>, invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return String::new();
    }
    let rows: String = invoices
        .iter()
        .map(|inv| {
            format!(
                "<tr><td>{}</td><td>{}.{:02} {}</td></tr>",
                inv.issued_at.format("%Y-%m-%d"),
                inv.amount_cents.div_euclid(100),
                inv.amount_cents.rem_euclid(100),
                escape_html(&inv.currency.to_uppercase()),
            )
        })
        .collect();
    format!(
        "<h2>{}</h2><table class=\"invoices\">{rows}</table>",
        escape_html(ctx.t("subscriptions:invoices"))
    )
}

pub fn lang_bundle() -> LangBundle {
    LangBundle::new()
        .locale(
            "en",
            [
                ("title", "Subscription"),
                ("menu", "Subscription"),
                ("status", "Status"),
                ("none", "You do not have a subscription yet"),
                ("subscribe", "Subscribe"),
                ("cancel", "Cancel subscription"),
                ("cancelled", "Your subscription will end with the current period"),
                ("invoices", "Invoices"),
            ],
        )
        .locale(
            "fr",
            [
                ("title", "Abonnement"),
                ("menu", "Abonnement"),
                ("status", "Statut"),
                ("subscribe", "S'abonner"),
                ("invoices", "Factures"),
            ],
        )
}
