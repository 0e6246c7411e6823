use async_trait::async_trait;
use modkit::{SecurityCtx, ServiceKind, ServiceName};

use crate::errors::SubscriptionsError;
use crate::models::{Invoice, InvoiceRange, SubscriptionLink, SubscriptionStatus};

/// Billing capability of the current user.
#[async_trait]
pub trait SubscriptionsApi: Send + Sync {
    /// Current subscription record; `None` when the user never subscribed.
    async fn get_active_subscription(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<Option<SubscriptionStatus>, SubscriptionsError>;

    /// Checkout link for starting or renewing a subscription.
    async fn get_subscription_link(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<SubscriptionLink, SubscriptionsError>;

    async fn get_invoices(
        &self,
        ctx: &SecurityCtx,
        range: InvoiceRange,
    ) -> Result<Vec<Invoice>, SubscriptionsError>;

    /// Stop renewal; access lasts until the end of the paid period.
    async fn cancel_subscription(
        &self,
        ctx: &SecurityCtx,
    ) -> Result<SubscriptionStatus, SubscriptionsError>;
}

/// `ServiceKind` marker for `SubscriptionsApi`.
pub struct SubscriptionsService;

impl ServiceKind for SubscriptionsService {
    const NAME: ServiceName = ServiceName::Subscriptions;
    type Api = dyn SubscriptionsApi;
}
