//! Form actions. Every action answers with a 303 and leaves its outcome as a
//! flash notification for the page it redirects to.

use auth_sdk::{AuthApi, AuthSession, OAuthProvider, OAuthService, UserUpdate};
use axum::Form;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use modkit::{Level, Notification};
use serde::Deserialize;
use std::sync::Arc;
use subscriptions_sdk::SubscriptionsService;
use tracing::{info, warn};

use super::{missing_service, session, signed_in};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

/// Blank fields mean "leave unchanged".
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AccountForm {
    pub email: String,
    pub password: String,
}

impl AccountForm {
    fn into_update(self) -> UserUpdate {
        let email = self.email.trim().to_owned();
        UserUpdate {
            email: (!email.is_empty()).then_some(email),
            password: (!self.password.is_empty()).then_some(self.password),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<Credentials>,
) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let result = auth.login_user(&form.email, &form.password).await;
    signed_in_or_back(&state, result, &state.routes.login_url)
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<Credentials>,
) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let result = auth.register_user(&form.email, &form.password).await;
    signed_in_or_back(&state, result, "/auth/register")
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    if let Some(token) = session::session_token(&headers)
        && let Err(err) = auth.logout(&token).await
    {
        warn!(error = %err, "logout failed");
    }
    session::redirect(&state.routes.login_url, [session::clear_session()])
}

pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EmailForm>,
) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let outcome = match auth.reset_password(&form.email).await {
        Ok(()) => note(Level::Info, translate(&state, &headers, "auth:reset.sent")),
        Err(err) => note(Level::Error, err.to_string()),
    };
    session::redirect_with_flash(&state.routes.login_url, &[outcome])
}

pub async fn oauth(State(state): State<AppState>, Path(provider): Path<String>) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let redirect = match provider.parse::<OAuthProvider>() {
        Ok(provider) => auth.oauth(provider).await,
        Err(err) => Err(err),
    };
    match redirect {
        Ok(redirect) => {
            info!(provider = %redirect.provider, "starting oauth flow");
            Redirect::to(&redirect.url).into_response()
        }
        Err(err) => session::redirect_with_flash(
            &state.routes.login_url,
            &[note(Level::Error, err.to_string())],
        ),
    }
}

pub async fn update_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AccountForm>,
) -> Response {
    let auth = match auth(&state) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let Some(token) = session::session_token(&headers) else {
        return Redirect::to(&state.routes.login_url).into_response();
    };

    let outcome = match auth.update_user(&token, form.into_update()).await {
        Ok(user) => {
            info!(user_id = %user.id, "account updated");
            note(Level::Success, translate(&state, &headers, "auth:account.saved"))
        }
        Err(auth_sdk::AuthError::InvalidSession) => {
            return session::redirect(&state.routes.login_url, [session::clear_session()]);
        }
        Err(err) => note(Level::Error, err.to_string()),
    };
    session::redirect_with_flash("/settings/account", &[outcome])
}

pub async fn cancel_subscription(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match signed_in(&state, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return Redirect::to(&state.routes.login_url).into_response(),
        Err(err) => return missing_service(&state, &err),
    };
    let Some(subscriptions) = state.manager.components().services::<SubscriptionsService>()
    else {
        return Redirect::to(&state.routes.not_found_url).into_response();
    };

    let outcome = match subscriptions.cancel_subscription(&user.security_ctx()).await {
        Ok(_) => note(
            Level::Success,
            translate(&state, &headers, "subscriptions:cancelled"),
        ),
        Err(err) => note(Level::Error, err.to_string()),
    };
    session::redirect_with_flash(&state.routes.subscriptions_url, &[outcome])
}

fn auth(state: &AppState) -> Result<Arc<dyn AuthApi>, Response> {
    state
        .manager
        .components()
        .require_service::<OAuthService>()
        .map_err(|err| missing_service(state, &err))
}

fn signed_in_or_back(
    state: &AppState,
    result: Result<AuthSession, auth_sdk::AuthError>,
    back: &str,
) -> Response {
    match result {
        Ok(signed) => {
            info!(user_id = %signed.user.id, "signed in");
            session::redirect(
                &state.routes.home_url,
                [session::set_session(&signed.token)],
            )
        }
        Err(err) => session::redirect_with_flash(back, &[note(Level::Error, err.to_string())]),
    }
}

fn note(level: Level, message: impl Into<String>) -> Notification {
    Notification {
        level,
        message: message.into(),
    }
}

fn translate(state: &AppState, headers: &HeaderMap, key: &str) -> String {
    let locale = session::locale(None, headers);
    let locale = locale
        .as_deref()
        .unwrap_or_else(|| state.manager.default_locale());
    state
        .manager
        .components()
        .translations()
        .t(locale, key)
        .to_owned()
}
