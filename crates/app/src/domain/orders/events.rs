//! Order change subscriptions

use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::{
    Stream, StreamExt,
    future::ready,
    stream::BoxStream,
};
use mockall::automock;
use serde::Deserialize;
use sqlx::{PgPool, postgres::PgListener};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{
    orders::records::{OrderStatus, OrderUuid},
    users::UserUuid,
};

/// Notification channel the `orders` trigger publishes on.
pub const ORDER_CHANGES_CHANNEL: &str = "order_changes";

/// An inserted order or a status change on an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderChange {
    pub order_id: OrderUuid,
    pub user_id: UserUuid,
    pub status: OrderStatus,

    /// `None` for newly placed orders.
    #[serde(default)]
    pub old_status: Option<OrderStatus>,
}

impl OrderChange {
    /// Decode a channel payload. Malformed payloads are logged and skipped.
    #[must_use]
    pub fn from_payload(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(change) => Some(change),
            Err(error) => {
                warn!(%error, "ignoring malformed order change payload");

                None
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum OrderEventsError {
    #[error("failed to listen for order changes")]
    Listen(#[from] sqlx::Error),
}

/// A live stream of one user's order changes. Dropping it unsubscribes.
pub struct Subscription {
    changes: BoxStream<'static, OrderChange>,
}

impl Subscription {
    pub fn new(changes: impl Stream<Item = OrderChange> + Send + 'static) -> Self {
        Self {
            changes: changes.boxed(),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Stream for Subscription {
    type Item = OrderChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.changes.poll_next_unpin(cx)
    }
}

#[automock]
#[async_trait]
pub trait OrderEvents: Send + Sync {
    /// Subscribe to changes on `user`'s orders.
    async fn subscribe(&self, user: UserUuid) -> Result<Subscription, OrderEventsError>;
}

#[derive(Debug, Clone)]
pub struct PgOrderEvents {
    pool: PgPool,
}

impl PgOrderEvents {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderEvents for PgOrderEvents {
    #[tracing::instrument(name = "orders.events.subscribe", skip(self), fields(user_uuid = %user), err)]
    async fn subscribe(&self, user: UserUuid) -> Result<Subscription, OrderEventsError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;

        listener.listen(ORDER_CHANGES_CHANNEL).await?;

        debug!("listening for order changes");

        let changes = listener.into_stream().filter_map(move |notification| {
            let change = match notification {
                Ok(notification) => OrderChange::from_payload(notification.payload()),
                Err(error) => {
                    warn!(%error, "order change listener error");

                    None
                }
            };

            ready(change.filter(|change| change.user_id == user))
        });

        Ok(Subscription::new(changes))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;
    use testresult::TestResult;

    use super::*;
    use crate::test::{TestContext, helpers};

    #[test]
    fn decodes_trigger_payload() -> TestResult {
        let order = OrderUuid::new();
        let user = UserUuid::new();
        let payload = format!(
            r#"{{"order_id":"{order}","user_id":"{user}","status":"out_for_delivery","old_status":"processing"}}"#
        );

        let change = OrderChange::from_payload(&payload).ok_or("payload did not decode")?;

        assert_eq!(change.order_id, order);
        assert_eq!(change.status, OrderStatus::OutForDelivery);
        assert_eq!(change.old_status, Some(OrderStatus::Processing));

        Ok(())
    }

    #[test]
    fn new_orders_have_no_old_status() -> TestResult {
        let payload = format!(
            r#"{{"order_id":"{}","user_id":"{}","status":"pending","old_status":null}}"#,
            OrderUuid::new(),
            UserUuid::new()
        );

        let change = OrderChange::from_payload(&payload).ok_or("payload did not decode")?;

        assert_eq!(change.old_status, None);

        Ok(())
    }

    #[test]
    fn unknown_statuses_decode() -> TestResult {
        let payload = format!(
            r#"{{"order_id":"{}","user_id":"{}","status":"lost_in_space"}}"#,
            OrderUuid::new(),
            UserUuid::new()
        );

        let change = OrderChange::from_payload(&payload).ok_or("payload did not decode")?;

        assert_eq!(change.status, OrderStatus::Unknown);

        Ok(())
    }

    #[test]
    fn malformed_payloads_are_skipped() {
        assert_eq!(OrderChange::from_payload("{\"order_id\": 1}"), None);
    }

    #[tokio::test]
    async fn subscription_yields_wrapped_changes() {
        let change = OrderChange {
            order_id: OrderUuid::new(),
            user_id: UserUuid::new(),
            status: OrderStatus::Confirmed,
            old_status: Some(OrderStatus::Pending),
        };

        let mut subscription = Subscription::new(stream::iter([change]));

        assert_eq!(subscription.next().await, Some(change));
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn subscribers_only_see_their_own_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let shopper = UserUuid::new();
        let someone_else = UserUuid::new();

        let mut subscription = ctx.order_events.subscribe(shopper).await?;

        helpers::create_order(&ctx, someone_else, 10_000).await?;
        let order = helpers::create_order(&ctx, shopper, 25_000).await?;
        helpers::set_order_status(&ctx, order, "confirmed").await?;

        let placed = tokio::time::timeout(Duration::from_secs(5), subscription.next()).await?;
        let confirmed = tokio::time::timeout(Duration::from_secs(5), subscription.next()).await?;

        assert_eq!(placed.map(|change| change.order_id), Some(order));
        assert_eq!(
            confirmed.map(|change| (change.old_status, change.status)),
            Some((Some(OrderStatus::Pending), OrderStatus::Confirmed))
        );

        Ok(())
    }
}
