//! Renderable UI units registered under a namespace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::i18n::TranslationTable;
use crate::manager::{Components, ModuleManager};
use crate::notify::Notifier;
use crate::security::SecurityCtx;

/// A rendered HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    html: String,
}

impl View {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }
}

/// Everything a component can read while rendering.
pub struct RenderCtx<'a> {
    pub slug: &'a str,
    pub query: &'a HashMap<String, String>,
    pub locale: &'a str,
    pub security: Option<&'a SecurityCtx>,
    pub notifier: &'a dyn Notifier,
    manager: &'a ModuleManager,
    translations: Arc<TranslationTable>,
}

impl<'a> RenderCtx<'a> {
    #[must_use]
    pub fn new(
        manager: &'a ModuleManager,
        slug: &'a str,
        query: &'a HashMap<String, String>,
        locale: &'a str,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            slug,
            query,
            locale,
            security: None,
            notifier,
            manager,
            translations: manager.components().translations(),
        }
    }

    #[must_use]
    pub fn with_security(mut self, security: Option<&'a SecurityCtx>) -> Self {
        self.security = security;
        self
    }

    /// Read side of the registry, e.g. to resolve a service while rendering.
    #[must_use]
    pub fn components(&self) -> Components<'a> {
        self.manager.components()
    }

    /// Translate `"<module>:<key>"` for the request locale.
    #[must_use]
    pub fn t<'k>(&'k self, key: &'k str) -> &'k str {
        self.translations.t(self.locale, key)
    }
}

#[async_trait]
pub trait Component: Send + Sync {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View;
}

/// Registry value: a shared handle to a component.
pub type ComponentFactory = Arc<dyn Component>;

struct FnComponent<F>(F);

#[async_trait]
impl<F> Component for FnComponent<F>
where
    F: Fn(&RenderCtx<'_>) -> View + Send + Sync,
{
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        (self.0)(ctx)
    }
}

/// Wrap a synchronous render function as a component.
pub fn from_fn<F>(render: F) -> ComponentFactory
where
    F: Fn(&RenderCtx<'_>) -> View + Send + Sync + 'static,
{
    Arc::new(FnComponent(render))
}

/// Escape text for safe inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<h1>` + body wrapper shared by module pages.
#[must_use]
pub fn page(title: &str, body: &str) -> View {
    View::new(format!(
        "<section class=\"page\"><h1>{}</h1>{body}</section>",
        escape_html(title)
    ))
}
