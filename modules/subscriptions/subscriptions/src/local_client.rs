//! Local client implementing `SubscriptionsApi` for the calling user.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use modkit::SecurityCtx;
use subscriptions_sdk::{
    Invoice, InvoiceRange, SubscriptionLink, SubscriptionStatus, SubscriptionsApi,
    SubscriptionsError,
};

use crate::domain::service::BillingService;

pub struct SubscriptionsLocalClient {
    service: Arc<BillingService>,
}

impl SubscriptionsLocalClient {
    #[must_use]
    pub fn new(service: Arc<BillingService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SubscriptionsApi for SubscriptionsLocalClient {
    async fn get_active_subscription(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<Option<SubscriptionStatus>, SubscriptionsError> {
        Ok(self.service.status(ctx.subject_id(), Utc::now()))
    }

    async fn get_subscription_link(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<SubscriptionLink, SubscriptionsError> {
        self.service
            .checkout_link(ctx.subject_id())
            .map_err(SubscriptionsError::from)
    }

    async fn get_invoices(
        &self,
        ctx: &SecurityCtx,
        range: InvoiceRange,
    ) -> Result<Vec<Invoice>, SubscriptionsError> {
        self.service
            .invoices(ctx.subject_id(), range)
            .map_err(SubscriptionsError::from)
    }

    async fn cancel_subscription(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<SubscriptionStatus, SubscriptionsError> {
        self.service
            .cancel(ctx.subject_id())
            .map_err(SubscriptionsError::from)
    }
}
