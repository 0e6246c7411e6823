//! In-memory billing state per user.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use subscriptions_sdk::{
    Invoice, InvoiceRange, InvoiceStatus, SubscriptionLink, SubscriptionState, SubscriptionStatus,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::DomainError;
use crate::config::SubscriptionsConfig;

#[derive(Default)]
struct Customer {
    subscription: Option<SubscriptionStatus>,
    invoices: Vec<Invoice>,
}

pub struct BillingService {
    config: SubscriptionsConfig,
    customers: RwLock<HashMap<Uuid, Customer>>,
}

impl BillingService {
    #[must_use]
    pub fn new(config: SubscriptionsConfig) -> Self {
        Self {
            config,
            customers: RwLock::new(HashMap::new()),
        }
    }

    /// Current subscription of `user_id` as of `now`.
    ///
    /// A subscription cancelled at period end turns `Canceled` once the period
    /// is over. With trials enabled, the first lookup of an unknown user
    /// starts one.
    #[must_use]
    pub fn status(&self, user_id: Uuid, now: DateTime<Utc>) -> Option<SubscriptionStatus> {
        let mut customers = self.customers.write();
        let customer = customers.entry(user_id).or_default();

        if customer.subscription.is_none() && self.config.trial_days > 0 {
            let end = now + days(self.config.trial_days);
            info!(user_id = %user_id, trial_end = %end, "trial started");
            customer.subscription = Some(SubscriptionStatus::new(
                SubscriptionState::Trialing,
                Some(end),
            ));
        }

        let subscription = customer.subscription.as_mut()?;
        if subscription.cancel_at_period_end
            && subscription.status == SubscriptionState::Active
            && subscription.current_period_end.is_some_and(|end| end < now)
        {
            debug!(user_id = %user_id, "cancelled subscription reached period end");
            subscription.status = SubscriptionState::Canceled;
        }
        Some(subscription.clone())
    }

    /// # Errors
    /// `CheckoutUrl` when the configured checkout url does not parse.
    pub fn checkout_link(&self, user_id: Uuid) -> Result<SubscriptionLink, DomainError> {
        let reference = user_id.to_string();
        let url = url::Url::parse_with_params(
            &self.config.checkout_url,
            [("client_reference_id", reference.as_str())],
        )?;
        Ok(SubscriptionLink { url: url.into() })
    }

    /// Record a paid period starting at `now`.
    pub fn activate(&self, user_id: Uuid, now: DateTime<Utc>) {
        let status = SubscriptionStatus::new(
            SubscriptionState::Active,
            Some(now + days(self.config.period_days)),
        );

        let mut customers = self.customers.write();
        let customer = customers.entry(user_id).or_default();
        customer.subscription = Some(status);
        customer.invoices.push(Invoice {
            id: Uuid::new_v4(),
            amount_cents: self.config.price_cents,
            currency: self.config.currency.clone(),
            status: InvoiceStatus::Paid,
            issued_at: now,
        });

        info!(user_id = %user_id, "subscription activated");
    }

    /// Overwrite the stored subscription, e.g. from a provider webhook.
    pub fn set_status(&self, user_id: Uuid, status: Option<SubscriptionStatus>) {
        self.customers.write().entry(user_id).or_default().subscription = status;
    }

    /// Invoices issued within `range`, newest first.
    ///
    /// # Errors
    /// `InvertedRange` when `range.from` is after `range.to`.
    pub fn invoices(&self, user_id: Uuid, range: InvoiceRange) -> Result<Vec<Invoice>, DomainError> {
        if let (Some(from), Some(to)) = (range.from, range.to)
            && from > to
        {
            return Err(DomainError::InvertedRange);
        }

        let customers = self.customers.read();
        let mut invoices: Vec<Invoice> = customers
            .get(&user_id)
            .map(|c| {
                c.invoices
                    .iter()
                    .filter(|inv| range.contains(inv.issued_at))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        invoices.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(invoices)
    }

    /// Stop renewal at the end of the current period.
    ///
    /// # Errors
    /// `NotFound` without a subscription, `AlreadyCancelled` when renewal is
    /// already off or the subscription is over.
    pub fn cancel(&self, user_id: Uuid) -> Result<SubscriptionStatus, DomainError> {
        let mut customers = self.customers.write();
        let subscription = customers
            .get_mut(&user_id)
            .and_then(|c| c.subscription.as_mut())
            .ok_or(DomainError::NotFound(user_id))?;

        if subscription.cancel_at_period_end || subscription.status == SubscriptionState::Canceled
        {
            return Err(DomainError::AlreadyCancelled(user_id));
        }

        subscription.cancel_at_period_end = true;
        if subscription.status == SubscriptionState::Trialing {
            subscription.status = SubscriptionState::Canceled;
        }
        info!(user_id = %user_id, "subscription cancelled");
        Ok(subscription.clone())
    }
}

fn days(n: u32) -> TimeDelta {
    TimeDelta::days(i64::from(n))
}
