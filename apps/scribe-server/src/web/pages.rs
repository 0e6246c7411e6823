//! GET handlers for `/app/*`, `/settings/*` and `/auth/*`.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{MethodRouter, get};
use modkit::{RecordingNavigator, RouteRequest, ToastBuffer, page};
use shell::{Mount, Resolution, RouteResolver};
use tracing::debug;

use super::layout::{self, Chrome};
use super::{bare_page, missing_service, session};
use crate::state::AppState;

type QueryMap = Query<HashMap<String, String>>;

/// Shell namespace a page handler serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    App,
    Settings,
    Auth,
}

impl Section {
    fn resolver<'a>(self, state: &'a AppState) -> RouteResolver<'a> {
        match self {
            Self::App => RouteResolver::app(&state.manager, &state.routes),
            Self::Settings => RouteResolver::settings(&state.manager, &state.routes),
            Self::Auth => RouteResolver::auth(&state.manager, &state.routes),
        }
    }

    fn chrome(self) -> Chrome {
        match self {
            Self::App => Chrome::App,
            Self::Settings => Chrome::Settings,
            Self::Auth => Chrome::Bare,
        }
    }
}

pub async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.routes.home_url)
}

pub async fn app(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Response {
    resolve(&state, Section::App, &slug, &uri, query, &headers).await
}

pub async fn settings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Response {
    resolve(&state, Section::Settings, &slug, &uri, query, &headers).await
}

pub async fn auth(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
    Query(query): QueryMap,
    headers: HeaderMap,
) -> Response {
    resolve(&state, Section::Auth, &slug, &uri, query, &headers).await
}

/// GET for a page whose path also carries a form action, so it has no
/// `{slug}` segment to extract.
pub fn fixed(section: Section, slug: &'static str) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              uri: Uri,
              Query(query): QueryMap,
              headers: HeaderMap| async move {
            resolve(&state, section, slug, &uri, query, &headers).await
        },
    )
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    let view = page("Page not found", "<p>Nothing is registered at this address.</p>");
    bare_page(&state, StatusCode::NOT_FOUND, &view)
}

async fn resolve(
    state: &AppState,
    section: Section,
    slug: &str,
    uri: &Uri,
    query: HashMap<String, String>,
    headers: &HeaderMap,
) -> Response {
    let path = uri.path();
    let locale = session::locale(query.get("lang").map(String::as_str), headers);
    let resolver = section.resolver(state);
    let chrome = section.chrome();

    let mut request = RouteRequest::ready(path, slug).with_query(query);
    if let Some(token) = session::session_token(headers) {
        request = request.with_session(token);
    }
    if let Some(locale) = locale {
        request = request.with_locale(locale);
    }

    let mount = Mount::new();
    let navigator = RecordingNavigator::new();
    let toasts = ToastBuffer::new();

    let resolution = match resolver.resolve(&request, &mount, &navigator, &toasts).await {
        Ok(resolution) => resolution,
        Err(err) => return missing_service(state, &err),
    };

    let carried = session::flash(headers);
    let had_flash = !carried.is_empty();
    let mut notes = carried;
    notes.extend(toasts.drain());

    match resolution {
        Resolution::Rendered(view) => {
            let locale = request
                .locale
                .as_deref()
                .unwrap_or_else(|| state.manager.default_locale());
            let html = layout::document(&state.manager, locale, chrome, &view, &notes);
            let response = Html(html).into_response();
            if had_flash {
                session::with_cookies(response, [session::clear_flash()])
            } else {
                response
            }
        }
        Resolution::Redirected(to) => {
            // The navigator saw the exact call; the resolution carries the same url.
            let target = navigator.last().map_or(to, |nav| nav.url().to_owned());
            debug!(from = path, to = %target, "page redirected");
            session::redirect_with_flash(&target, &notes)
        }
        Resolution::Loading | Resolution::Discarded => {
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
