//! `/app/templates` page.

use async_trait::async_trait;
use modkit::{Component, LangBundle, RenderCtx, View, escape_html, page};
use templates_sdk::{PageRequest, Template, TemplatesService};

pub struct TemplatesPage;

#[async_trait]
impl Component for TemplatesPage {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        let title = ctx.t("templates:title");
        let (Some(security), Some(api)) =
            (ctx.security, ctx.components().services::<TemplatesService>())
        else {
            return page(title, "");
        };

        let offset = ctx
            .query
            .get("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let request = PageRequest::new(offset, PageRequest::DEFAULT_LIMIT);

        let listing = match api.list_templates(security, request).await {
            Ok(listing) => listing,
            Err(err) => {
                ctx.notifier.error(&err.to_string());
                return page(title, "");
            }
        };

        if listing.items.is_empty() {
            let empty = format!("<p>{}</p>", escape_html(ctx.t("templates:empty")));
            return page(title, &empty);
        }

        let items: String = listing.items.iter().map(item).collect();
        let more = if listing.has_more() {
            format!(
                r#"<a href="/app/templates?offset={}">{}</a>"#,
                listing.offset + listing.items.len(),
                escape_html(ctx.t("templates:more"))
            )
        } else {
            String::new()
        };
        page(title, &format!(r#"<ul class="templates">{items}</ul>{more}"#))
    }
}

fn item(template: &Template) -> String {
    format!(
        r#"<li data-id="{}">{}</li>"#,
        template.id,
        escape_html(&template.name)
    )
}

pub fn lang_bundle() -> LangBundle {
    LangBundle::new()
        .locale(
            "en",
            [
                ("title", "Templates"),
                ("menu", "Templates"),
                ("empty", "No templates yet"),
                ("more", "More"),
            ],
        )
        .locale(
            "fr",
            [
                ("title", "Mod\u{e8}les"),
                ("menu", "Mod\u{e8}les"),
                ("empty", "Aucun mod\u{e8}le"),
            ],
        )
}
