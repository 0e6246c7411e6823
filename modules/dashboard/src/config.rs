use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DashboardConfig {
    /// Maximum number of menu shortcuts shown on the page.
    pub max_shortcuts: usize,
    /// Show the subscription state when the subscriptions service is installed.
    pub show_subscription: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_shortcuts: 6,
            show_subscription: true,
        }
    }
}
