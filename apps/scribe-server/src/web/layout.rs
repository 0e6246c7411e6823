//! Full HTML document around a rendered page: menus and toasts.

use modkit::menu::sort_by_order;
use modkit::{Level, MenuItem, ModuleManager, Notification, TranslationTable, View, escape_html};

/// Which menus surround the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chrome {
    /// Auth and error pages.
    Bare,
    /// Main menu.
    App,
    /// Main menu plus the settings menu.
    Settings,
}

#[must_use]
pub fn document(
    manager: &ModuleManager,
    locale: &str,
    chrome: Chrome,
    view: &View,
    toasts: &[Notification],
) -> String {
    let components = manager.components();
    let translations = components.translations();

    let mut parts = vec![format!(
        r#"<!doctype html><html lang="{}"><head><meta charset="utf-8"><title>Scribe</title></head><body>"#,
        escape_html(locale)
    )];
    if chrome != Chrome::Bare {
        parts.push(menu("menu", components.menus(), &translations, locale));
    }
    if chrome == Chrome::Settings {
        parts.push(menu(
            "settings-menu",
            components.menu_settings(),
            &translations,
            locale,
        ));
    }
    if !toasts.is_empty() {
        parts.push(toast_list(toasts));
    }
    parts.push(format!("<main>{}</main></body></html>", view.html()));
    parts.concat()
}

fn menu(class: &str, mut items: Vec<MenuItem>, translations: &TranslationTable, locale: &str) -> String {
    sort_by_order(&mut items);
    let links: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<a href="{}" data-icon="{}">{}</a>"#,
                escape_html(&item.url),
                escape_html(&item.icon),
                escape_html(translations.t(locale, &item.label))
            )
        })
        .collect();
    format!(r#"<nav class="{class}">{links}</nav>"#)
}

fn toast_list(toasts: &[Notification]) -> String {
    let items: String = toasts
        .iter()
        .map(|toast| {
            let level = match toast.level {
                Level::Info => "info",
                Level::Success => "success",
                Level::Error => "error",
            };
            format!(
                r#"<p class="toast toast-{level}" role="status">{}</p>"#,
                escape_html(&toast.message)
            )
        })
        .collect();
    format!(r#"<div class="toasts">{items}</div>"#)
}
