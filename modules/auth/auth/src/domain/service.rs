//! In-memory account store.
//!
//! Accounts, sessions and one-time codes live behind a single lock. Outgoing
//! mail (confirmation and reset codes) is queued in a bounded outbox and logged.
//!
//! Every collection stays bounded: a user holds at most one pending code per
//! kind, codes and sessions expire, expired sessions are swept whenever a new
//! one opens, and the outbox drops its oldest mail once full.

use std::collections::{HashMap, VecDeque};

use auth_sdk::{OAuthProvider, OAuthRedirect, User, UserUpdate};
use chrono::{DateTime, TimeDelta, Utc};
use modkit::SessionToken;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::DomainError;
use super::password::{hash_password, verify_password};
use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    ConfirmEmail,
    ResetPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub kind: MailKind,
    pub code: String,
}

struct Account {
    user: User,
    password_hash: String,
}

struct Session {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

struct PendingCode {
    user_id: Uuid,
    kind: MailKind,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
    sessions: HashMap<String, Session>,
    codes: HashMap<String, PendingCode>,
    outbox: VecDeque<OutboundMail>,
}

pub struct AuthService {
    config: AuthConfig,
    state: RwLock<State>,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            state: RwLock::new(State::default()),
        }
    }

    /// Create the configured seed accounts, already confirmed.
    ///
    /// # Errors
    /// Validation or duplicate-email errors of the first bad seed entry.
    pub fn seed(&self) -> Result<usize, DomainError> {
        for seed in &self.config.seed_users {
            let user = self.create_account(&seed.email, &seed.password, true)?;
            debug!(user_id = %user.id, "seed account created");
        }
        Ok(self.config.seed_users.len())
    }

    /// # Errors
    /// `Validation` for a malformed email or short password, `EmailTaken`
    /// for a known address.
    pub fn register(&self, email: &str, password: &str) -> Result<(User, SessionToken), DomainError> {
        let user = self.create_account(email, password, false)?;
        {
            let mut state = self.state.write();
            self.send_code(&mut state, user.id, &user.email, MailKind::ConfirmEmail);
        }
        info!(user_id = %user.id, "account registered");
        let token = self.open_session(user.id);
        Ok((user, token))
    }

    /// # Errors
    /// `InvalidCredentials` for an unknown email or wrong password,
    /// `EmailNotConfirmed` when confirmation is required and still pending.
    pub fn login(&self, email: &str, password: &str) -> Result<(User, SessionToken), DomainError> {
        let email = normalize_email(email);
        let user = {
            let state = self.state.read();
            let account = state
                .by_email
                .get(&email)
                .and_then(|id| state.accounts.get(id))
                .ok_or(DomainError::InvalidCredentials)?;
            if !verify_password(password, &account.password_hash) {
                return Err(DomainError::InvalidCredentials);
            }
            account.user.clone()
        };

        if self.config.require_email_confirmation && !user.email_confirmed {
            return Err(DomainError::EmailNotConfirmed);
        }

        debug!(user_id = %user.id, "login succeeded");
        let token = self.open_session(user.id);
        Ok((user, token))
    }

    /// Build the provider's authorize URL.
    ///
    /// # Errors
    /// `ProviderNotConfigured` when the provider has no config section,
    /// `ProviderUrl` when its `authorize_url` does not parse.
    pub fn authorize_url(&self, provider: OAuthProvider) -> Result<OAuthRedirect, DomainError> {
        let cfg = self
            .config
            .oauth
            .get(provider.as_str())
            .ok_or_else(|| DomainError::ProviderNotConfigured(provider.to_string()))?;

        let state = one_time_code();
        let scope = cfg.scopes.join(" ");
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", cfg.client_id.as_str()),
            ("redirect_uri", cfg.redirect_url.as_str()),
            ("state", state.as_str()),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }

        let url = url::Url::parse_with_params(&cfg.authorize_url, &params).map_err(|source| {
            DomainError::ProviderUrl {
                provider: provider.to_string(),
                source,
            }
        })?;

        Ok(OAuthRedirect {
            provider,
            url: url.into(),
            state,
        })
    }

    /// Owner of a live session. Expired sessions are dropped on lookup.
    #[must_use]
    pub fn current_user(&self, token: &SessionToken) -> Option<User> {
        let now = Utc::now();
        let user_id = {
            let state = self.state.read();
            let session = state.sessions.get(token.as_str())?;
            (session.expires_at > now).then_some(session.user_id)
        };

        match user_id {
            Some(id) => self.state.read().accounts.get(&id).map(|a| a.user.clone()),
            None => {
                self.state.write().sessions.remove(token.as_str());
                debug!("expired session removed");
                None
            }
        }
    }

    /// Returns whether a session was closed.
    #[must_use]
    pub fn logout(&self, token: &SessionToken) -> bool {
        self.state.write().sessions.remove(token.as_str()).is_some()
    }

    /// Queue a reset code for a known address; unknown addresses are ignored.
    pub fn request_password_reset(&self, email: &str) {
        let email = normalize_email(email);
        let mut state = self.state.write();
        let Some(&user_id) = state.by_email.get(&email) else {
            debug!("password reset requested for unknown address");
            return;
        };
        self.send_code(&mut state, user_id, &email, MailKind::ResetPassword);
    }

    /// Set a new password with a code from `request_password_reset`.
    ///
    /// # Errors
    /// `UnknownCode` or a password `Validation` error.
    pub fn complete_password_reset(&self, code: &str, password: &str) -> Result<User, DomainError> {
        self.validate_password(password)?;
        let mut state = self.state.write();
        let user_id = take_code(&mut state, code, MailKind::ResetPassword)?;
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or(DomainError::UnknownCode)?;
        account.password_hash = hash_password(password);
        let user = account.user.clone();
        state.sessions.retain(|_, s| s.user_id != user_id);
        info!(user_id = %user_id, "password reset completed");
        Ok(user)
    }

    /// # Errors
    /// `InvalidSession`, `EmailTaken` or a `Validation` error.
    pub fn update(&self, token: &SessionToken, update: &UserUpdate) -> Result<User, DomainError> {
        let current = self.current_user(token).ok_or(DomainError::InvalidSession)?;

        let new_email = update
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| *email != current.email);
        if let Some(email) = &new_email {
            validate_email(email)?;
        }
        let new_hash = match update.password.as_deref() {
            Some(password) => {
                self.validate_password(password)?;
                Some(hash_password(password))
            }
            None => None,
        };

        let mut state = self.state.write();
        if let Some(email) = &new_email {
            if state.by_email.contains_key(email) {
                return Err(DomainError::EmailTaken(email.clone()));
            }
            state.by_email.remove(&current.email);
            state.by_email.insert(email.clone(), current.id);
        }

        let account = state
            .accounts
            .get_mut(&current.id)
            .ok_or(DomainError::InvalidSession)?;
        if let Some(hash) = new_hash {
            account.password_hash = hash;
        }
        if let Some(email) = new_email.clone() {
            account.user.email = email;
            account.user.email_confirmed = false;
        }
        let user = account.user.clone();

        if let Some(email) = new_email {
            self.send_code(&mut state, user.id, &email, MailKind::ConfirmEmail);
        }

        info!(user_id = %user.id, "account updated");
        Ok(user)
    }

    /// # Errors
    /// `UnknownCode` for unknown or already used codes.
    pub fn confirm_email(&self, code: &str) -> Result<User, DomainError> {
        let mut state = self.state.write();
        let user_id = take_code(&mut state, code, MailKind::ConfirmEmail)?;
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or(DomainError::UnknownCode)?;
        account.user.email_confirmed = true;
        info!(user_id = %user_id, "email confirmed");
        Ok(account.user.clone())
    }

    /// Mail still queued, oldest first.
    #[must_use]
    pub fn outbox(&self) -> Vec<OutboundMail> {
        self.state.read().outbox.iter().cloned().collect()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.state.read().sessions.len()
    }

    #[must_use]
    pub fn pending_code_count(&self) -> usize {
        self.state.read().codes.len()
    }

    fn create_account(
        &self,
        email: &str,
        password: &str,
        confirmed: bool,
    ) -> Result<User, DomainError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        self.validate_password(password)?;

        let mut state = self.state.write();
        if state.by_email.contains_key(&email) {
            return Err(DomainError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            email_confirmed: confirmed,
            created_at: Utc::now(),
        };
        state.by_email.insert(email, user.id);
        state.accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                password_hash: hash_password(password),
            },
        );
        Ok(user)
    }

    fn open_session(&self, user_id: Uuid) -> SessionToken {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = expiry(now, self.config.session_ttl_secs);

        let mut state = self.state.write();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at > now);
        let swept = before - state.sessions.len();
        if swept > 0 {
            debug!(swept, "expired sessions removed");
        }

        // Oldest sessions of this user go first once the limit is reached.
        let mut own: Vec<(DateTime<Utc>, String)> = state
            .sessions
            .iter()
            .filter(|(_, s)| s.user_id == user_id)
            .map(|(t, s)| (s.expires_at, t.clone()))
            .collect();
        let keep = self.config.max_sessions_per_user.saturating_sub(1);
        if own.len() > keep {
            own.sort_unstable();
            let excess = own.len() - keep;
            for (_, stale) in own.into_iter().take(excess) {
                state.sessions.remove(&stale);
            }
        }

        state
            .sessions
            .insert(token.clone(), Session { user_id, expires_at });
        SessionToken::new(token)
    }

    /// Replace any pending code of `kind` for `user_id` with a fresh one and mail it.
    fn send_code(&self, state: &mut State, user_id: Uuid, to: &str, kind: MailKind) {
        let now = Utc::now();
        state
            .codes
            .retain(|_, c| c.expires_at > now && (c.user_id != user_id || c.kind != kind));

        let code = one_time_code();
        state.codes.insert(
            code.clone(),
            PendingCode {
                user_id,
                kind,
                expires_at: expiry(now, self.config.code_ttl_secs),
            },
        );

        info!(?kind, "mail queued");
        if state.outbox.len() >= self.config.outbox_capacity {
            state.outbox.pop_front();
        }
        if self.config.outbox_capacity > 0 {
            state.outbox.push_back(OutboundMail {
                to: to.to_owned(),
                kind,
                code,
            });
        }
    }

    fn validate_password(&self, password: &str) -> Result<(), DomainError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(DomainError::validation(
                "password",
                format!(
                    "must be at least {} characters",
                    self.config.min_password_length
                ),
            ));
        }
        Ok(())
    }
}

/// Consume a live code of `kind`. Expired codes are dropped and reported as unknown.
fn take_code(state: &mut State, code: &str, kind: MailKind) -> Result<Uuid, DomainError> {
    if !state.codes.get(code).is_some_and(|pending| pending.kind == kind) {
        return Err(DomainError::UnknownCode);
    }
    let pending = state.codes.remove(code).ok_or(DomainError::UnknownCode)?;
    if pending.expires_at <= Utc::now() {
        debug!(?kind, "expired code rejected");
        return Err(DomainError::UnknownCode);
    }
    Ok(pending.user_id)
}

fn expiry(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let ttl = i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn one_time_code() -> String {
    Uuid::new_v4().simple().to_string()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.contains('@') && domain.contains('.')
        });
    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("email", "not a valid email address"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{OAuthProviderConfig, SeedUser};

    fn service() -> AuthService {
        AuthService::new(AuthConfig::default())
    }

    #[test]
    fn register_then_login() {
        let svc = service();
        let (user, token) = svc.register(" Doc@Example.com ", "s3cret-pass").unwrap();

        assert_eq!(user.email, "doc@example.com");
        assert!(!user.email_confirmed);
        assert_eq!(svc.current_user(&token), Some(user.clone()));

        let (again, other) = svc.login("doc@example.com", "s3cret-pass").unwrap();
        assert_eq!(again.id, user.id);
        assert_ne!(other, token);
        assert_eq!(svc.session_count(), 2);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let svc = service();
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        let err = svc.register("DOC@example.com", "other-pass").unwrap_err();
        assert!(matches!(err, DomainError::EmailTaken(_)));
    }

    #[test]
    fn input_validation() {
        let svc = service();
        assert!(matches!(
            svc.register("not-an-email", "s3cret-pass"),
            Err(DomainError::Validation { field: "email", .. })
        ));
        assert!(matches!(
            svc.register("doc@example.com", "short"),
            Err(DomainError::Validation { field: "password", .. })
        ));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_the_same() {
        let svc = service();
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        assert!(matches!(
            svc.login("doc@example.com", "nope-nope"),
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.login("who@example.com", "s3cret-pass"),
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[test]
    fn confirmation_can_be_required() {
        let svc = AuthService::new(AuthConfig {
            require_email_confirmation: true,
            ..AuthConfig::default()
        });
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        assert!(matches!(
            svc.login("doc@example.com", "s3cret-pass"),
            Err(DomainError::EmailNotConfirmed)
        ));

        let code = svc.outbox()[0].code.clone();
        let user = svc.confirm_email(&code).unwrap();
        assert!(user.email_confirmed);
        assert!(svc.login("doc@example.com", "s3cret-pass").is_ok());
        assert!(matches!(svc.confirm_email(&code), Err(DomainError::UnknownCode)));
    }

    #[test]
    fn zero_ttl_sessions_expire_immediately() {
        let svc = AuthService::new(AuthConfig {
            session_ttl_secs: 0,
            ..AuthConfig::default()
        });
        let (_, token) = svc.register("doc@example.com", "s3cret-pass").unwrap();
        assert_eq!(svc.current_user(&token), None);
        assert_eq!(svc.session_count(), 0);
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let svc = AuthService::new(AuthConfig {
            session_ttl_secs: u64::MAX,
            ..AuthConfig::default()
        });
        let (user, token) = svc.register("doc@example.com", "s3cret-pass").unwrap();
        assert_eq!(svc.current_user(&token).map(|u| u.id), Some(user.id));
    }

    #[test]
    fn logout_closes_the_session() {
        let svc = service();
        let (_, token) = svc.register("doc@example.com", "s3cret-pass").unwrap();
        assert!(svc.logout(&token));
        assert!(!svc.logout(&token));
        assert_eq!(svc.current_user(&token), None);
    }

    #[test]
    fn password_reset_flow() {
        let svc = service();
        let (_, token) = svc.register("doc@example.com", "s3cret-pass").unwrap();

        svc.request_password_reset("nobody@example.com");
        svc.request_password_reset("doc@example.com");

        let mail = svc.outbox();
        assert_eq!(mail.len(), 2);
        assert_eq!(mail[1].kind, MailKind::ResetPassword);

        svc.complete_password_reset(&mail[1].code, "new-s3cret").unwrap();
        assert_eq!(svc.current_user(&token), None);
        assert!(svc.login("doc@example.com", "new-s3cret").is_ok());
        assert!(svc.login("doc@example.com", "s3cret-pass").is_err());
    }

    #[test]
    fn repeated_resets_keep_state_bounded() {
        let svc = AuthService::new(AuthConfig {
            outbox_capacity: 16,
            max_sessions_per_user: 4,
            ..AuthConfig::default()
        });
        svc.register("doc@example.com", "s3cret-pass").unwrap();

        for _ in 0..500 {
            svc.request_password_reset("doc@example.com");
        }
        for _ in 0..50 {
            svc.login("doc@example.com", "s3cret-pass").unwrap();
        }

        // One confirmation and one reset code, whatever the number of requests.
        assert_eq!(svc.pending_code_count(), 2);
        assert_eq!(svc.outbox().len(), 16);
        assert_eq!(svc.session_count(), 4);

        let latest = svc.outbox().last().unwrap().code.clone();
        let earlier = svc.outbox()[0].code.clone();
        assert!(matches!(
            svc.complete_password_reset(&earlier, "new-s3cret"),
            Err(DomainError::UnknownCode)
        ));
        svc.complete_password_reset(&latest, "new-s3cret").unwrap();
    }

    #[test]
    fn expired_codes_are_rejected_and_swept() {
        let svc = AuthService::new(AuthConfig {
            code_ttl_secs: 0,
            ..AuthConfig::default()
        });
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        svc.register("other@example.com", "s3cret-pass").unwrap();
        assert_eq!(svc.pending_code_count(), 1);

        let code = svc.outbox()[1].code.clone();
        assert!(matches!(svc.confirm_email(&code), Err(DomainError::UnknownCode)));
        assert_eq!(svc.pending_code_count(), 0);
    }

    #[test]
    fn codes_only_work_for_their_own_purpose() {
        let svc = service();
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        let confirm = svc.outbox()[0].code.clone();
        assert!(matches!(
            svc.complete_password_reset(&confirm, "new-s3cret"),
            Err(DomainError::UnknownCode)
        ));
        assert!(svc.confirm_email(&confirm).is_ok());
    }

    #[test]
    fn expired_sessions_are_swept_on_login() {
        let svc = AuthService::new(AuthConfig {
            session_ttl_secs: 0,
            ..AuthConfig::default()
        });
        svc.register("doc@example.com", "s3cret-pass").unwrap();
        for _ in 0..20 {
            svc.login("doc@example.com", "s3cret-pass").unwrap();
        }
        assert_eq!(svc.session_count(), 1);
    }

    #[test]
    fn email_change_requires_new_confirmation() {
        let svc = service();
        let (_, token) = svc.register("doc@example.com", "s3cret-pass").unwrap();
        svc.register("taken@example.com", "s3cret-pass").unwrap();

        let taken = svc.update(
            &token,
            &UserUpdate {
                email: Some("taken@example.com".to_owned()),
                password: None,
            },
        );
        assert!(matches!(taken, Err(DomainError::EmailTaken(_))));

        let user = svc
            .update(
                &token,
                &UserUpdate {
                    email: Some("new@example.com".to_owned()),
                    password: Some("brand-new-pass".to_owned()),
                },
            )
            .unwrap();
        assert_eq!(user.email, "new@example.com");
        assert!(!user.email_confirmed);
        assert!(svc.login("new@example.com", "brand-new-pass").is_ok());
        assert!(svc.login("doc@example.com", "s3cret-pass").is_err());
        assert_eq!(svc.outbox().last().unwrap().to, "new@example.com");
    }

    #[test]
    fn seed_accounts_are_confirmed() {
        let svc = AuthService::new(AuthConfig {
            seed_users: vec![SeedUser {
                email: "admin@example.com".to_owned(),
                password: "admin-pass".to_owned(),
            }],
            ..AuthConfig::default()
        });
        assert_eq!(svc.seed().unwrap(), 1);
        let (user, _) = svc.login("admin@example.com", "admin-pass").unwrap();
        assert!(user.email_confirmed);
    }

    #[test]
    fn authorize_url_carries_client_and_state() {
        let mut config = AuthConfig::default();
        config.oauth.insert(
            "google".to_owned(),
            OAuthProviderConfig {
                authorize_url: "https://accounts.example.com/o/oauth2/auth".to_owned(),
                client_id: "scribe".to_owned(),
                redirect_url: "http://localhost:8087/auth/oauth/callback".to_owned(),
                scopes: vec!["openid".to_owned(), "email".to_owned()],
            },
        );
        let svc = AuthService::new(config);

        let redirect = svc.authorize_url(OAuthProvider::Google).unwrap();
        let url = url::Url::parse(&redirect.url).unwrap();
        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("accounts.example.com"));
        assert_eq!(params["client_id"], "scribe");
        assert_eq!(params["state"], redirect.state);
        assert_eq!(params["scope"], "openid email");

        assert!(matches!(
            svc.authorize_url(OAuthProvider::Apple),
            Err(DomainError::ProviderNotConfigured(_))
        ));
    }
}
