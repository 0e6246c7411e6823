//! Cookies carried between requests: the session token and one-shot flash
//! notifications that survive a redirect.

use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use modkit::{Level, Notification, SessionToken};
use url::form_urlencoded;

pub const SESSION_COOKIE: &str = "scribe_session";
pub const FLASH_COOKIE: &str = "scribe_flash";

/// Value of cookie `name`, if the request carries it.
#[must_use]
pub fn cookie<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    cookie(headers, SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .map(SessionToken::new)
}

#[must_use]
pub fn set_session(token: &SessionToken) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        token.as_str()
    )
}

#[must_use]
pub fn clear_session() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Notifications left by the previous response.
#[must_use]
pub fn flash(headers: &HeaderMap) -> Vec<Notification> {
    let Some(raw) = cookie(headers, FLASH_COOKIE) else {
        return Vec::new();
    };
    form_urlencoded::parse(raw.as_bytes())
        .filter_map(|(level, message)| {
            Some(Notification {
                level: parse_level(&level)?,
                message: message.into_owned(),
            })
        })
        .collect()
}

/// `None` when there is nothing to carry over.
#[must_use]
pub fn set_flash(notes: &[Notification]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }
    let mut encoder = form_urlencoded::Serializer::new(String::new());
    for note in notes {
        encoder.append_pair(level_name(note.level), &note.message);
    }
    Some(format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        encoder.finish()
    ))
}

#[must_use]
pub fn clear_flash() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// `?lang=` first, then the primary tag of the first `Accept-Language` entry.
#[must_use]
pub fn locale(query_lang: Option<&str>, headers: &HeaderMap) -> Option<String> {
    if let Some(lang) = query_lang.filter(|l| !l.is_empty()) {
        return Some(lang.to_ascii_lowercase());
    }
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .and_then(|tag| tag.trim().split('-').next())
        .filter(|primary| !primary.is_empty() && *primary != "*")
        .map(str::to_ascii_lowercase)
}

/// 303 to `to`, with the given `Set-Cookie` values.
#[must_use]
pub fn redirect(to: &str, cookies: impl IntoIterator<Item = String>) -> Response {
    with_cookies(Redirect::to(to).into_response(), cookies)
}

/// 303 to `to`, carrying `notes` as flash.
#[must_use]
pub fn redirect_with_flash(to: &str, notes: &[Notification]) -> Response {
    redirect(to, set_flash(notes))
}

#[must_use]
pub fn with_cookies(mut response: Response, cookies: impl IntoIterator<Item = String>) -> Response {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "dropping unrepresentable cookie"),
        }
    }
    response
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Info => "info",
        Level::Success => "success",
        Level::Error => "error",
    }
}

fn parse_level(name: &str) -> Option<Level> {
    match name {
        "info" => Some(Level::Info),
        "success" => Some(Level::Success),
        "error" => Some(Level::Error),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let h = headers(&[(COOKIE, "theme=dark; scribe_session=abc123; other=1")]);
        assert_eq!(session_token(&h).unwrap().as_str(), "abc123");

        let cleared = headers(&[(COOKIE, "scribe_session=")]);
        assert!(session_token(&cleared).is_none());
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn flash_survives_encoding() {
        let notes = vec![
            Notification {
                level: Level::Error,
                message: "Invalid email or password; try again".to_owned(),
            },
            Notification {
                level: Level::Success,
                message: "caf\u{e9} & co".to_owned(),
            },
        ];
        let set = set_flash(&notes).unwrap();
        let value = set.split(';').next().unwrap();
        assert!(!value.contains(' '));

        let h = headers(&[(COOKIE, value)]);
        assert_eq!(flash(&h), notes);
        assert!(set_flash(&[]).is_none());
    }

    #[test]
    fn unknown_flash_levels_are_dropped() {
        let h = headers(&[(COOKIE, "scribe_flash=warn=x&info=ok")]);
        let notes = flash(&h);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "ok");
    }

    #[test]
    fn locale_prefers_query_then_header() {
        let h = headers(&[(ACCEPT_LANGUAGE, "fr-CA,fr;q=0.9,en;q=0.5")]);
        assert_eq!(locale(None, &h).as_deref(), Some("fr"));
        assert_eq!(locale(Some("EN"), &h).as_deref(), Some("en"));
        assert_eq!(locale(None, &headers(&[(ACCEPT_LANGUAGE, "*")])), None);
        assert_eq!(locale(None, &HeaderMap::new()), None);
    }

    #[test]
    fn redirect_appends_every_cookie() {
        let res = redirect("/auth/login", [clear_session(), clear_flash()]);
        assert_eq!(res.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get_all(SET_COOKIE).iter().count(), 2);
        assert_eq!(res.headers()["location"], "/auth/login");
    }
}
