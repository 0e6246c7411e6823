//! `/app/recording` page: audio upload form with an optional template picker.

use async_trait::async_trait;
use modkit::{Component, LangBundle, RenderCtx, ServiceName, View, escape_html, page};
use templates_sdk::{PageRequest, TemplatesService};

pub struct RecordingPage;

#[async_trait]
impl Component for RecordingPage {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        let title = ctx.t("recording:title");
        if !ctx.components().has_service(ServiceName::MedicalApi) {
            let body = format!("<p>{}</p>", escape_html(ctx.t("recording:unavailable")));
            return page(title, &body);
        }

        let body = format!(
            r#"<form method="post" action="/api/recordings" enctype="multipart/form-data"><label>{audio} <input type="file" name="audio" accept="audio/*" required></label>{picker}<button type="submit">{submit}</button></form>"#,
            audio = escape_html(ctx.t("recording:audio")),
            picker = template_picker(ctx).await,
            submit = escape_html(ctx.t("recording:submit")),
        );
        page(title, &body)
    }
}

/// Empty when the templates module is absent or the user has none.
async fn template_picker(ctx: &RenderCtx<'_>) -> String {
    let (Some(security), Some(templates)) =
        (ctx.security, ctx.components().services::<TemplatesService>())
    else {
        return String::new();
    };

    let listing = match templates
        .list_templates(security, PageRequest::new(0, PageRequest::DEFAULT_LIMIT))
        .await
    {
        Ok(listing) => listing,
        Err(err) => {
            tracing::warn!(error = %err, "template list unavailable for recording page");
            return String::new();
        }
    };
    if listing.items.is_empty() {
        return String::new();
    }

    let options: String = listing
        .items
        .iter()
        .map(|t| {
            let name = escape_html(&t.name);
            format!(r#"<option value="{name}">{name}</option>"#)
        })
        .collect();
    format!(
        r#"<label>{label} <select name="template"><option value="">-</option>{options}</select></label>"#,
        label = escape_html(ctx.t("recording:template")),
    )
}

pub fn lang_bundle() -> LangBundle {
    LangBundle::new()
        .locale(
            "en",
            [
                ("title", "New recording"),
                ("menu", "Record"),
                ("audio", "Audio file"),
                ("template", "Template"),
                ("submit", "Generate report"),
                ("unavailable", "Recording is not available right now"),
                ("done", "Report generated"),
            ],
        )
        .locale(
            "fr",
            [
                ("title", "Nouvel enregistrement"),
                ("menu", "Enregistrer"),
                ("audio", "Fichier audio"),
                ("template", "Mod\u{e8}le"),
                ("submit", "G\u{e9}n\u{e9}rer le compte rendu"),
                ("done", "Compte rendu g\u{e9}n\u{e9}r\u{e9}"),
            ],
        )
}
