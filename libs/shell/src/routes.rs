use serde::{Deserialize, Serialize};

/// Well-known shell URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RoutesConfig {
    pub login_url: String,
    /// App slug that stays reachable with an invalid subscription.
    pub subscriptions_slug: String,
    pub subscriptions_url: String,
    pub not_found_url: String,
    /// Landing page after sign-in.
    pub home_url: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_url: "/auth/login".to_owned(),
            subscriptions_slug: "subscriptions".to_owned(),
            subscriptions_url: "/app/subscriptions".to_owned(),
            not_found_url: "/errors/not-found".to_owned(),
            home_url: "/app/dashboard".to_owned(),
        }
    }
}
