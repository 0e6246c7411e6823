#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Access gate: login check, subscription check, exemption and cancellation.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use common::{FakeAuth, FakeSubscriptions, VALID_TOKEN, active, expired, manager_with, user};
use modkit::{
    Navigation, RecordingNavigator, RouteRequest, ServiceError, ServiceName, SessionToken,
    ToastBuffer,
};
use shell::{AccessGate, DenyReason, GateOutcome, GatePolicy, Mount, RoutesConfig};
use subscriptions_sdk::{SubscriptionStatus, SubscriptionsError};

fn signed_in(slug: &str) -> RouteRequest {
    RouteRequest::ready(format!("/app/{slug}"), slug).with_session(SessionToken::new(VALID_TOKEN))
}

#[tokio::test]
async fn unauthenticated_user_is_sent_to_login_without_ready() {
    // Arrange
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), None);
    let routes = RoutesConfig::default();
    let toasts = ToastBuffer::new();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);
    let request = RouteRequest::ready("/app/dashboard", "dashboard");

    // Act
    let outcome = AccessGate::new(manager.components(), &routes, &toasts)
        .run_access_check(
            "dashboard",
            &request,
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(
        outcome,
        GateOutcome::Redirected {
            to: "/auth/login".to_owned(),
            reason: DenyReason::NotLoggedIn,
        }
    );
    assert_eq!(nav.history(), vec![Navigation::Replace("/auth/login".to_owned())]);
    assert_eq!(ready.load(Ordering::SeqCst), 0);
    assert!(toasts.snapshot().is_empty());
}

#[tokio::test]
async fn unknown_session_is_sent_to_login() {
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let request = RouteRequest::ready("/settings/account", "account")
        .with_session(SessionToken::new("stale"));

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check("account", &request, &Mount::new(), &nav, GatePolicy::Login, || {})
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        GateOutcome::Redirected {
            reason: DenyReason::NotLoggedIn,
            ..
        }
    ));
}

#[tokio::test]
async fn auth_errors_raise_a_toast_and_redirect() {
    let auth = FakeAuth {
        fail: true,
        ..FakeAuth::default()
    };
    let manager = manager_with(Some(Arc::new(auth)), None);
    let routes = RoutesConfig::default();
    let toasts = ToastBuffer::new();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &toasts)
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Redirected { .. }));
    assert_eq!(toasts.snapshot().len(), 1);
    assert_eq!(nav.last(), Some(Navigation::Replace("/auth/login".to_owned())));
}

#[tokio::test]
async fn expired_subscription_is_sent_to_subscriptions_page() {
    // Arrange
    let now = Utc::now();
    let subs = Arc::new(FakeSubscriptions::returning(Some(expired(now))));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(Arc::clone(&subs)));
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);

    // Act
    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .at(now)
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(
        outcome,
        GateOutcome::Redirected {
            to: "/app/subscriptions".to_owned(),
            reason: DenyReason::SubscriptionInvalid,
        }
    );
    assert_eq!(
        nav.history(),
        vec![Navigation::Replace("/app/subscriptions".to_owned())]
    );
    assert_eq!(ready.load(Ordering::SeqCst), 0);
    assert_eq!(*subs.seen_subject.lock(), Some(user().id));
}

#[tokio::test]
async fn subscriptions_page_is_exempt_from_subscription_check() {
    let now = Utc::now();
    let subs = Arc::new(FakeSubscriptions::returning(Some(expired(now))));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(subs));
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .at(now)
        .run_access_check(
            "subscriptions",
            &signed_in("subscriptions"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Ready { user: Some(user()) });
    assert!(nav.history().is_empty());
    assert_eq!(ready.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_subscription_record_is_invalid() {
    let subs = Arc::new(FakeSubscriptions::returning(None));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(subs));
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "templates",
            &signed_in("templates"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        GateOutcome::Redirected {
            reason: DenyReason::SubscriptionInvalid,
            ..
        }
    ));
}

#[tokio::test]
async fn subscription_errors_raise_a_toast_and_count_as_invalid() {
    let subs = Arc::new(FakeSubscriptions::failing(SubscriptionsError::Unavailable(
        "timeout".to_owned(),
    )));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(subs));
    let routes = RoutesConfig::default();
    let toasts = ToastBuffer::new();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &toasts)
        .run_access_check(
            "recording",
            &signed_in("recording"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Redirected { .. }));
    let toasts = toasts.snapshot();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("timeout"));
}

#[tokio::test]
async fn active_subscription_reaches_ready_once() {
    let subs = Arc::new(FakeSubscriptions::returning(Some(active())));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(subs));
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Ready { user: Some(user()) });
    assert_eq!(ready.load(Ordering::SeqCst), 1);
    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn absent_subscriptions_module_passes() {
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Ready { user: Some(_) }));
}

#[tokio::test]
async fn login_policy_never_asks_for_subscription() {
    let now = Utc::now();
    let subs = Arc::new(FakeSubscriptions::returning(Some(expired(now))));
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), Some(Arc::clone(&subs)));
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "account",
            &signed_in("account"),
            &Mount::new(),
            &nav,
            GatePolicy::Login,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Ready { .. }));
    assert_eq!(subs.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn public_policy_does_not_need_auth_service() {
    let manager = manager_with(None, None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "login",
            &RouteRequest::ready("/auth/login", "login"),
            &Mount::new(),
            &nav,
            GatePolicy::Public,
            || {},
        )
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Ready { user: None });
}

#[tokio::test]
async fn missing_auth_service_is_an_error() {
    let manager = manager_with(None, None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let err = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotRegistered {
            name: ServiceName::OAuth
        }
    ));
    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn unmount_during_login_check_discards_everything() {
    // Arrange
    let mount = Mount::new();
    let auth = Arc::new(FakeAuth::default());
    *auth.unmount_on_call.lock() = Some(mount.clone());
    let subs = Arc::new(FakeSubscriptions::returning(Some(active())));
    let manager = manager_with(Some(Arc::clone(&auth)), Some(Arc::clone(&subs)));
    let routes = RoutesConfig::default();
    let toasts = ToastBuffer::new();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);

    // Act
    let outcome = AccessGate::new(manager.components(), &routes, &toasts)
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &mount,
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome, GateOutcome::Cancelled);
    assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    assert_eq!(subs.calls.load(Ordering::SeqCst), 0);
    assert!(nav.history().is_empty());
    assert!(toasts.snapshot().is_empty());
    assert_eq!(ready.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unmounted_page_is_not_checked() {
    let auth = Arc::new(FakeAuth::default());
    let manager = manager_with(Some(Arc::clone(&auth)), None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let mount = Mount::new();
    mount.unmount();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check("dashboard", &signed_in("dashboard"), &mount, &nav, GatePolicy::Login, || {})
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Cancelled);
    assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[tracing_test::traced_test]
async fn without_subscriptions_module_only_login_is_checked() {
    let manager = manager_with(Some(Arc::new(FakeAuth::default())), None);
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "dashboard",
            &signed_in("dashboard"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {},
        )
        .await
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Ready { user: Some(_) }));
    assert!(nav.history().is_empty());
    assert!(logs_contain("skipping subscription check"));
}

#[tokio::test]
async fn provider_reported_expiry_is_sent_to_subscriptions_page() {
    let status: SubscriptionStatus = serde_json::from_value(serde_json::json!({
        "status": "expired",
        "current_period_end": null,
        "cancel_at_period_end": false,
    }))
    .unwrap();
    let manager = manager_with(
        Some(Arc::new(FakeAuth::default())),
        Some(Arc::new(FakeSubscriptions::returning(Some(status)))),
    );
    let routes = RoutesConfig::default();
    let nav = RecordingNavigator::new();
    let ready = AtomicUsize::new(0);

    let outcome = AccessGate::new(manager.components(), &routes, &ToastBuffer::new())
        .run_access_check(
            "templates",
            &signed_in("templates"),
            &Mount::new(),
            &nav,
            GatePolicy::LoginAndSubscription,
            || {
                ready.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GateOutcome::Redirected {
            to: "/app/subscriptions".to_owned(),
            reason: DenyReason::SubscriptionInvalid,
        }
    );
    assert_eq!(
        nav.history(),
        vec![Navigation::Replace("/app/subscriptions".to_owned())]
    );
    assert_eq!(ready.load(Ordering::SeqCst), 0);
}
