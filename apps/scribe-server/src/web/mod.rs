//! HTTP surface of the shell.
//!
//! Page routes delegate to the `shell` resolvers; form actions call module
//! services directly and answer with a redirect plus flash notifications.

mod actions;
mod api;
pub mod layout;
mod pages;
pub mod session;

use auth_sdk::{OAuthService, User};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use modkit::{SecurityCtx, ServiceError, SessionToken, View, page};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::{error, warn};

use crate::state::AppState;

use layout::Chrome;
use pages::Section;

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    let router = Router::new()
        .route("/", get(pages::home))
        .route("/healthz", get(api::healthz))
        .route("/api/menus", get(api::menus))
        .route("/api/recordings", post(api::create_recording))
        .route("/app/{slug}", get(pages::app))
        .route("/app/subscriptions/cancel", post(actions::cancel_subscription))
        .route("/settings/{slug}", get(pages::settings))
        .route(
            "/settings/account",
            pages::fixed(Section::Settings, "account").post(actions::update_account),
        )
        .route("/auth/{slug}", get(pages::auth))
        .route(
            "/auth/login",
            pages::fixed(Section::Auth, "login").post(actions::login),
        )
        .route(
            "/auth/register",
            pages::fixed(Section::Auth, "register").post(actions::register),
        )
        .route(
            "/auth/reset-password",
            pages::fixed(Section::Auth, "reset-password").post(actions::reset_password),
        )
        .route(
            "/auth/logout",
            pages::fixed(Section::Auth, "logout").post(actions::logout),
        )
        .route("/auth/oauth/{provider}", get(actions::oauth))
        .route("/errors/not-found", get(pages::not_found))
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::max(body_limit));

    apply_trace_layer(router).with_state(state)
}

/// Request span with status and latency recorded on response.
fn apply_trace_layer(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                },
            ),
    )
}

/// User behind the request's session cookie.
pub struct SignedIn {
    pub user: User,
    pub token: SessionToken,
}

impl SignedIn {
    #[must_use]
    pub fn security_ctx(&self) -> SecurityCtx {
        self.user.security_ctx().with_session(self.token.clone())
    }
}

/// `Ok(None)` without a cookie, for an unknown session, or when the auth
/// service fails to answer.
///
/// # Errors
/// `ServiceError` when no auth service is registered.
pub async fn signed_in(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<SignedIn>, ServiceError> {
    let auth = state.manager.components().require_service::<OAuthService>()?;
    let Some(token) = session::session_token(headers) else {
        return Ok(None);
    };
    match auth.get_logged_user(&token).await {
        Ok(user) => Ok(user.map(|user| SignedIn { user, token })),
        Err(err) => {
            warn!(error = %err, "session lookup failed");
            Ok(None)
        }
    }
}

/// 500 page for a missing mandatory service.
#[must_use]
pub fn missing_service(state: &AppState, err: &ServiceError) -> Response {
    error!(error = %err, "request needs an unregistered service");
    let view = page("Internal error", "<p>The application is misconfigured.</p>");
    let html = layout::document(
        &state.manager,
        state.manager.default_locale(),
        Chrome::Bare,
        &view,
        &[],
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
}

fn bare_page(state: &AppState, status: StatusCode, view: &View) -> Response {
    let html = layout::document(
        &state.manager,
        state.manager.default_locale(),
        Chrome::Bare,
        view,
        &[],
    );
    (status, Html(html)).into_response()
}
