//! Route resolvers for `/app/{slug}`, `/settings/{slug}` and `/auth/{slug}`.

use modkit::{
    ModuleManager, Namespace, Navigator, Notifier, RenderCtx, RouteRequest, ServiceError, View,
};
use tracing::debug;

use crate::gate::{AccessGate, GateOutcome, GatePolicy};
use crate::mount::Mount;
use crate::routes::RoutesConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Router parameters are not resolved yet.
    Loading,
    /// Navigation was sent to this URL (gate failure or unknown slug).
    Redirected(String),
    Rendered(View),
    /// The page was unmounted before resolution finished.
    Discarded,
}

/// Resolves one namespace's slugs to registered components.
pub struct RouteResolver<'a> {
    manager: &'a ModuleManager,
    routes: &'a RoutesConfig,
    namespace: Namespace,
    policy: GatePolicy,
}

impl<'a> RouteResolver<'a> {
    /// `/app/{slug}`: login and subscription required.
    #[must_use]
    pub fn app(manager: &'a ModuleManager, routes: &'a RoutesConfig) -> Self {
        Self::new(manager, routes, Namespace::App, GatePolicy::LoginAndSubscription)
    }

    /// `/settings/{slug}`: login required.
    #[must_use]
    pub fn settings(manager: &'a ModuleManager, routes: &'a RoutesConfig) -> Self {
        Self::new(manager, routes, Namespace::Settings, GatePolicy::Login)
    }

    /// `/auth/{slug}`: no checks.
    #[must_use]
    pub fn auth(manager: &'a ModuleManager, routes: &'a RoutesConfig) -> Self {
        Self::new(manager, routes, Namespace::Auth, GatePolicy::Public)
    }

    #[must_use]
    pub fn new(
        manager: &'a ModuleManager,
        routes: &'a RoutesConfig,
        namespace: Namespace,
        policy: GatePolicy,
    ) -> Self {
        Self {
            manager,
            routes,
            namespace,
            policy,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    #[must_use]
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Gate, look up and render the component named by `request.slug`.
    ///
    /// # Errors
    /// `ServiceError` when the gate needs a service that is not registered.
    pub async fn resolve(
        &self,
        request: &RouteRequest,
        mount: &Mount,
        navigator: &dyn Navigator,
        notifier: &dyn Notifier,
    ) -> Result<Resolution, ServiceError> {
        if !request.ready {
            return Ok(Resolution::Loading);
        }

        let slug = request.slug.as_deref().unwrap_or_default();
        let components = self.manager.components();

        let gate = AccessGate::new(components, self.routes, notifier);
        let outcome = gate
            .run_access_check(slug, request, mount, navigator, self.policy, || {
                debug!(namespace = %self.namespace, slug, "page ready");
            })
            .await?;

        let user = match outcome {
            GateOutcome::Ready { user } => user,
            GateOutcome::Redirected { to, .. } => return Ok(Resolution::Redirected(to)),
            GateOutcome::Cancelled => return Ok(Resolution::Discarded),
        };

        let Some(component) = components.component(self.namespace, slug) else {
            debug!(namespace = %self.namespace, slug, "no component registered");
            navigator.replace(&self.routes.not_found_url);
            return Ok(Resolution::Redirected(self.routes.not_found_url.clone()));
        };

        let security = user.map(|user| {
            let ctx = user.security_ctx();
            match request.session.clone() {
                Some(token) => ctx.with_session(token),
                None => ctx,
            }
        });
        let locale = request
            .locale
            .as_deref()
            .unwrap_or_else(|| self.manager.default_locale());

        let ctx = RenderCtx::new(self.manager, slug, &request.query, locale, notifier)
            .with_security(security.as_ref());

        Ok(match mount.guard(component.render(&ctx)).await {
            Some(view) => Resolution::Rendered(view),
            None => Resolution::Discarded,
        })
    }
}
