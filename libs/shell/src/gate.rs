//! Access gate run before a shell page renders.
//!
//! The check is sequential: the login check, then (for app pages, and only
//! when the subscriptions module is installed) the subscription check.
//! Failures replace the current location; `on_ready` runs only on success.

use auth_sdk::{OAuthService, User};
use chrono::{DateTime, Utc};
use modkit::{Components, Navigator, Notifier, RouteRequest, ServiceError};
use subscriptions_sdk::{SubscriptionsService, subscription_is_invalid};
use tracing::{debug, warn};

use crate::mount::Mount;
use crate::routes::RoutesConfig;

/// Which checks a page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    /// No checks (`/auth/*`).
    Public,
    /// Signed-in user (`/settings/*`).
    Login,
    /// Signed-in user with a valid subscription (`/app/*`).
    LoginAndSubscription,
}

impl GatePolicy {
    #[must_use]
    pub const fn checks_login(self) -> bool {
        !matches!(self, Self::Public)
    }

    #[must_use]
    pub const fn checks_subscription(self) -> bool {
        matches!(self, Self::LoginAndSubscription)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotLoggedIn,
    SubscriptionInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// All checks passed; `user` is `None` for public pages.
    Ready { user: Option<User> },
    /// A check failed and the navigator was sent to `to`.
    Redirected { to: String, reason: DenyReason },
    /// The page was unmounted while a check was in flight.
    Cancelled,
}

pub struct AccessGate<'a> {
    components: Components<'a>,
    routes: &'a RoutesConfig,
    notifier: &'a dyn Notifier,
    now: Option<DateTime<Utc>>,
}

impl<'a> AccessGate<'a> {
    #[must_use]
    pub fn new(
        components: Components<'a>,
        routes: &'a RoutesConfig,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            components,
            routes,
            notifier,
            now: None,
        }
    }

    /// Evaluate subscription periods against a fixed instant instead of the clock.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Run the checks required by `policy` for the page `slug`.
    ///
    /// # Errors
    /// `ServiceError::NotRegistered` when a login check is required and no
    /// `oauth` service is registered.
    pub async fn run_access_check<F>(
        &self,
        slug: &str,
        request: &RouteRequest,
        mount: &Mount,
        navigator: &dyn Navigator,
        policy: GatePolicy,
        on_ready: F,
    ) -> Result<GateOutcome, ServiceError>
    where
        F: FnOnce(),
    {
        if !mount.is_mounted() {
            return Ok(GateOutcome::Cancelled);
        }

        if !policy.checks_login() {
            on_ready();
            return Ok(GateOutcome::Ready { user: None });
        }

        let Some(user) = self.check_login(request, mount).await? else {
            return Ok(if mount.is_mounted() {
                self.deny(navigator, slug, DenyReason::NotLoggedIn)
            } else {
                GateOutcome::Cancelled
            });
        };

        if policy.checks_subscription() {
            match self.check_subscription(slug, &user, request, mount).await {
                Checked::Cancelled => return Ok(GateOutcome::Cancelled),
                Checked::Fail => {
                    return Ok(self.deny(navigator, slug, DenyReason::SubscriptionInvalid));
                }
                Checked::Pass => {}
            }
        }

        debug!(slug, "access granted");
        on_ready();
        Ok(GateOutcome::Ready { user: Some(user) })
    }

    /// `Ok(None)` covers both "not signed in" and "cancelled"; the caller
    /// tells them apart through the mount.
    async fn check_login(
        &self,
        request: &RouteRequest,
        mount: &Mount,
    ) -> Result<Option<User>, ServiceError> {
        let auth = self.components.require_service::<OAuthService>()?;

        let Some(token) = request.session.as_ref() else {
            return Ok(None);
        };

        match mount.guard(auth.get_logged_user(token)).await {
            None | Some(Ok(None)) => Ok(None),
            Some(Ok(Some(user))) => Ok(Some(user)),
            Some(Err(err)) => {
                warn!(error = %err, "login check failed");
                self.notifier.error(&err.to_string());
                Ok(None)
            }
        }
    }

    async fn check_subscription(
        &self,
        slug: &str,
        user: &User,
        request: &RouteRequest,
        mount: &Mount,
    ) -> Checked {
        let Some(subscriptions) = self.components.services::<SubscriptionsService>() else {
            debug!("subscriptions module not installed, skipping subscription check");
            return Checked::Pass;
        };

        let mut ctx = user.security_ctx();
        if let Some(token) = request.session.clone() {
            ctx = ctx.with_session(token);
        }

        let status = match mount.guard(subscriptions.get_active_subscription(&ctx)).await {
            None => return Checked::Cancelled,
            Some(Ok(status)) => status,
            Some(Err(err)) => {
                warn!(error = %err, "subscription check failed");
                self.notifier.error(&err.to_string());
                None
            }
        };

        let now = self.now.unwrap_or_else(Utc::now);
        if !subscription_is_invalid(status.as_ref(), now) {
            return Checked::Pass;
        }
        if slug == self.routes.subscriptions_slug {
            debug!(slug, "invalid subscription, page exempt");
            return Checked::Pass;
        }
        Checked::Fail
    }

    fn deny(&self, navigator: &dyn Navigator, slug: &str, reason: DenyReason) -> GateOutcome {
        let to = match reason {
            DenyReason::NotLoggedIn => &self.routes.login_url,
            DenyReason::SubscriptionInvalid => &self.routes.subscriptions_url,
        };
        debug!(slug, ?reason, to = %to, "access denied");
        navigator.replace(to);
        GateOutcome::Redirected {
            to: to.clone(),
            reason,
        }
    }
}

enum Checked {
    Pass,
    Fail,
    Cancelled,
}
