//! Configuration for the auth module.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,
    pub min_password_length: usize,
    /// Refuse sign-in until the email address is confirmed.
    pub require_email_confirmation: bool,
    /// OAuth providers by name (`google`, `apple`, `microsoft`).
    pub oauth: HashMap<String, OAuthProviderConfig>,
    /// Accounts created at startup.
    pub seed_users: Vec<SeedUser>,
    /// Lifetime of confirmation and reset codes in seconds.
    pub code_ttl_secs: u64,
    /// Queued mail kept before the oldest is dropped.
    pub outbox_capacity: usize,
    /// Live sessions per user; opening one more closes the oldest.
    pub max_sessions_per_user: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 7 * 24 * 60 * 60,
            min_password_length: 8,
            require_email_confirmation: false,
            oauth: HashMap::new(),
            seed_users: Vec::new(),
            code_ttl_secs: 24 * 60 * 60,
            outbox_capacity: 256,
            max_sessions_per_user: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthProviderConfig {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_url: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}
