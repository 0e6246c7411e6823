#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use auth_sdk::{
    AuthApi, AuthError, AuthSession, OAuthProvider, OAuthRedirect, OAuthService, User, UserUpdate,
};
use chrono::{DateTime, Utc};
use modkit::{ModuleManager, SecurityCtx, SessionToken};
use parking_lot::Mutex;
use shell::Mount;
use subscriptions_sdk::{
    Invoice, InvoiceRange, SubscriptionLink, SubscriptionState, SubscriptionStatus,
    SubscriptionsApi, SubscriptionsError, SubscriptionsService,
};
use uuid::Uuid;

pub const VALID_TOKEN: &str = "token-1";

pub fn user() -> User {
    User {
        id: Uuid::from_u128(1),
        email: "doc@example.com".to_owned(),
        email_confirmed: true,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Auth service that knows exactly one session token.
#[derive(Default)]
pub struct FakeAuth {
    pub fail: bool,
    pub calls: AtomicUsize,
    /// Unmounted while the login check is in flight.
    pub unmount_on_call: Mutex<Option<Mount>>,
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn register_user(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        Err(AuthError::Internal)
    }

    async fn login_user(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        Err(AuthError::InvalidCredentials)
    }

    async fn oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect, AuthError> {
        Err(AuthError::provider(provider.as_str(), "disabled"))
    }

    async fn get_logged_user(&self, token: &SessionToken) -> Result<Option<User>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(mount) = self.unmount_on_call.lock().take() {
            mount.unmount();
        }
        if self.fail {
            return Err(AuthError::Internal);
        }
        Ok((token.as_str() == VALID_TOKEN).then(user))
    }

    async fn logout(&self, _token: &SessionToken) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn update_user(&self, _token: &SessionToken, _update: UserUpdate) -> Result<User, AuthError> {
        Err(AuthError::InvalidSession)
    }

    async fn confirm_email(&self, _code: &str) -> Result<User, AuthError> {
        Err(AuthError::InvalidConfirmationCode)
    }
}

/// Subscriptions service returning a fixed status.
pub struct FakeSubscriptions {
    pub status: Result<Option<SubscriptionStatus>, SubscriptionsError>,
    pub calls: AtomicUsize,
    pub seen_subject: Mutex<Option<Uuid>>,
}

impl FakeSubscriptions {
    pub fn returning(status: Option<SubscriptionStatus>) -> Self {
        Self {
            status: Ok(status),
            calls: AtomicUsize::new(0),
            seen_subject: Mutex::new(None),
        }
    }

    pub fn failing(err: SubscriptionsError) -> Self {
        Self {
            status: Err(err),
            calls: AtomicUsize::new(0),
            seen_subject: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SubscriptionsApi for FakeSubscriptions {
    async fn get_active_subscription(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<Option<SubscriptionStatus>, SubscriptionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_subject.lock() = Some(ctx.subject_id());
        self.status.clone()
    }

    async fn get_subscription_link(
        &self,
        _ctx: &SecurityCtx,
    ) -> Result<SubscriptionLink, SubscriptionsError> {
        Ok(SubscriptionLink {
            url: "https://billing.example.com/checkout".to_owned(),
        })
    }

    async fn get_invoices(
        &self,
        _ctx: &SecurityCtx,
        _range: InvoiceRange,
    ) -> Result<Vec<Invoice>, SubscriptionsError> {
        Ok(Vec::new())
    }

    async fn cancel_subscription(
        &self,
        _ctx: &SecurityCtx,
    ) -> Result<SubscriptionStatus, SubscriptionsError> {
        Err(SubscriptionsError::NotFound)
    }
}

pub fn active() -> SubscriptionStatus {
    SubscriptionStatus::new(SubscriptionState::Active, None)
}

pub fn expired(now: DateTime<Utc>) -> SubscriptionStatus {
    SubscriptionStatus::new(
        SubscriptionState::Canceled,
        Some(now - chrono::Duration::days(1)),
    )
}

pub fn manager_with(
    auth: Option<Arc<FakeAuth>>,
    subscriptions: Option<Arc<FakeSubscriptions>>,
) -> ModuleManager {
    let manager = ModuleManager::new();
    if let Some(auth) = auth {
        manager.subscribe().service::<OAuthService>(auth);
    }
    if let Some(subscriptions) = subscriptions {
        manager
            .subscribe()
            .service::<SubscriptionsService>(subscriptions);
    }
    manager
}
