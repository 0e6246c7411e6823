use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SubscriptionsConfig {
    /// Hosted checkout page; the user id is appended as `client_reference_id`.
    pub checkout_url: String,
    pub price_cents: i64,
    pub currency: String,
    pub period_days: u32,
    /// Length of the trial started on first lookup; `0` disables trials.
    pub trial_days: u32,
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            checkout_url: "https://billing.example.com/checkout".to_owned(),
            price_cents: 2900,
            currency: "usd".to_owned(),
            period_days: 30,
            trial_days: 0,
        }
    }
}
