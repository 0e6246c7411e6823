#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use modkit::{
    ConfigProvider, ModuleManager, RenderCtx, SecurityCtx, StaticConfigProvider, ToastBuffer,
    bootstrap,
};
use serde_json::json;
use subscriptions::{SubscriptionsModule, SubscriptionsService};
use uuid::Uuid;

fn bootstrapped(module: &SubscriptionsModule, config: serde_json::Value) -> Arc<ModuleManager> {
    let manager = Arc::new(ModuleManager::new());
    let provider: Arc<dyn ConfigProvider> =
        Arc::new(StaticConfigProvider::default().with_module("subscriptions", config));
    bootstrap(&manager, &provider, &[module]).unwrap();
    manager
}

async fn render_page(manager: &ModuleManager, security: &SecurityCtx) -> String {
    let page = manager.components().app("subscriptions").unwrap();
    let query = HashMap::new();
    let toasts = ToastBuffer::new();
    let ctx = RenderCtx::new(manager, "subscriptions", &query, "en", &toasts)
        .with_security(Some(security));
    page.render(&ctx).await.into_html()
}

#[test]
fn registers_service_page_and_menu() {
    let module = SubscriptionsModule::default();
    let manager = bootstrapped(&module, json!({}));
    let components = manager.components();

    assert!(components.services::<SubscriptionsService>().is_some());
    assert!(components.app("subscriptions").is_some());
    assert_eq!(components.menus()[0].url, "/app/subscriptions");
    assert!(module.billing().is_some());
}

#[tokio::test]
async fn page_without_subscription_offers_checkout() {
    let module = SubscriptionsModule::default();
    let manager = bootstrapped(&module, json!({}));
    let security = SecurityCtx::new(Uuid::new_v4(), "doc@example.com");

    let html = render_page(&manager, &security).await;

    assert!(html.contains("You do not have a subscription yet"));
    assert!(html.contains("client_reference_id="));
    assert!(!html.contains("/app/subscriptions/cancel"));
}

#[tokio::test]
async fn page_with_active_subscription_lists_invoices() {
    let module = SubscriptionsModule::default();
    let manager = bootstrapped(&module, json!({ "config": { "price_cents": 1250, "currency": "eur" } }));
    let security = SecurityCtx::new(Uuid::new_v4(), "doc@example.com");
    module
        .billing()
        .unwrap()
        .activate(security.subject_id(), Utc::now());

    let html = render_page(&manager, &security).await;

    assert!(html.contains(r#"data-status="active""#));
    assert!(html.contains("/app/subscriptions/cancel"));
    assert!(html.contains("12.50 EUR"));
}

#[tokio::test]
async fn trial_config_starts_trials() {
    let module = SubscriptionsModule::default();
    let manager = bootstrapped(&module, json!({ "config": { "trial_days": 7 } }));
    let security = SecurityCtx::new(Uuid::new_v4(), "doc@example.com");

    let html = render_page(&manager, &security).await;
    assert!(html.contains(r#"data-status="trialing""#));
}

#[test]
fn bad_checkout_url_fails_registration() {
    let module = SubscriptionsModule::default();
    let manager = Arc::new(ModuleManager::new());
    let provider: Arc<dyn ConfigProvider> = Arc::new(StaticConfigProvider::default().with_module(
        "subscriptions",
        json!({ "config": { "checkout_url": "::nope" } }),
    ));

    let err = bootstrap(&manager, &provider, &[&module]).unwrap_err();
    assert!(format!("{err:#}").contains("checkout_url"));
    assert!(manager.components().services::<SubscriptionsService>().is_none());
}
