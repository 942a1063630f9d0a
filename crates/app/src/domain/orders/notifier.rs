//! Order notifications
//!
//! Turns order changes into user-facing notifications and hands them to one
//! or more sinks (the in-app feed, the desktop notifier).

use std::sync::Arc;

use futures::{Stream, StreamExt};
use mockall::automock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::orders::{
    events::OrderChange,
    records::{OrderStatus, OrderUuid},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub order_id: OrderUuid,
    pub title: String,
    pub body: String,
}

impl Notification {
    /// The notification for `change`, if it is worth telling the shopper about.
    ///
    /// Changes that leave the status where it was produce nothing.
    #[must_use]
    pub fn for_change(change: &OrderChange) -> Option<Self> {
        if change.old_status == Some(change.status) {
            return None;
        }

        let reference = short_reference(change.order_id);

        let (title, body) = match change.status {
            OrderStatus::Pending => ("Order placed", format!("We've received order #{reference}.")),
            OrderStatus::Confirmed => (
                "Order confirmed",
                format!("Order #{reference} has been confirmed."),
            ),
            OrderStatus::Processing => (
                "Packing your order",
                format!("Order #{reference} is being packed."),
            ),
            OrderStatus::OutForDelivery => (
                "Out for delivery",
                format!("Order #{reference} is on its way."),
            ),
            OrderStatus::Delivered => (
                "Order delivered",
                format!("Order #{reference} has been delivered. Enjoy!"),
            ),
            OrderStatus::Cancelled => (
                "Order cancelled",
                format!("Order #{reference} has been cancelled."),
            ),
            OrderStatus::Unknown => return None,
        };

        Some(Self {
            order_id: change.order_id,
            title: title.to_string(),
            body,
        })
    }
}

/// First eight hex digits of the order id, as shown on invoices.
fn short_reference(order: OrderUuid) -> String {
    order
        .into_uuid()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect::<String>()
        .to_uppercase()
}

/// Somewhere notifications are shown.
#[automock]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl NotificationSink for Vec<Arc<dyn NotificationSink>> {
    fn notify(&self, notification: &Notification) {
        for sink in self {
            sink.notify(notification);
        }
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: &Notification) {
        info!(
            order_uuid = %notification.order_id,
            title = %notification.title,
            "{}",
            notification.body
        );
    }
}

#[derive(Clone)]
pub struct OrderNotifier {
    sink: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for OrderNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderNotifier").finish_non_exhaustive()
    }
}

impl OrderNotifier {
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Forward notifications for `changes` until the stream ends or `cancel` fires.
    ///
    /// Returns the number of notifications delivered.
    pub async fn run(
        &self,
        changes: impl Stream<Item = OrderChange> + Send,
        cancel: CancellationToken,
    ) -> usize {
        let mut changes = std::pin::pin!(changes);
        let mut delivered = 0;

        loop {
            let change = tokio::select! {
                () = cancel.cancelled() => break,
                change = changes.next() => change,
            };

            let Some(change) = change else {
                break;
            };

            match Notification::for_change(&change) {
                Some(notification) => {
                    self.sink.notify(&notification);
                    delivered += 1;
                }
                None => debug!(order_uuid = %change.order_id, "order change needs no notification"),
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use mockall::predicate::function;

    use crate::domain::users::UserUuid;

    use super::*;

    fn change(old_status: Option<OrderStatus>, status: OrderStatus) -> OrderChange {
        OrderChange {
            order_id: OrderUuid::new(),
            user_id: UserUuid::new(),
            status,
            old_status,
        }
    }

    #[test]
    fn unchanged_status_produces_nothing() {
        let unchanged = change(Some(OrderStatus::Processing), OrderStatus::Processing);

        assert_eq!(Notification::for_change(&unchanged), None);
    }

    #[test]
    fn delivery_produces_a_notification() {
        let delivered = change(Some(OrderStatus::OutForDelivery), OrderStatus::Delivered);

        let notification = Notification::for_change(&delivered);

        assert_eq!(
            notification.as_ref().map(|n| n.title.as_str()),
            Some("Order delivered")
        );
    }

    #[test]
    fn references_are_eight_uppercase_hex_digits() {
        let reference = short_reference(OrderUuid::new());

        assert_eq!(reference.len(), 8);
        assert!(
            reference
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[tokio::test]
    async fn forwards_each_meaningful_change() {
        let mut sink = MockNotificationSink::new();

        sink.expect_notify()
            .with(function(|n: &Notification| n.title == "Out for delivery"))
            .times(1)
            .return_const(());

        sink.expect_notify()
            .with(function(|n: &Notification| n.title == "Order confirmed"))
            .times(1)
            .return_const(());

        let changes = stream::iter([
            change(Some(OrderStatus::Pending), OrderStatus::Confirmed),
            change(Some(OrderStatus::Confirmed), OrderStatus::Confirmed),
            change(Some(OrderStatus::Processing), OrderStatus::OutForDelivery),
            change(None, OrderStatus::Unknown),
        ]);

        let notifier = OrderNotifier::new(Arc::new(sink));

        let delivered = notifier.run(changes, CancellationToken::new()).await;

        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn cancellation_stops_forwarding() {
        let mut sink = MockNotificationSink::new();

        sink.expect_notify().never();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let notifier = OrderNotifier::new(Arc::new(sink));

        let delivered = notifier.run(stream::pending(), cancel).await;

        assert_eq!(delivered, 0);
    }

    #[test]
    fn fan_out_reaches_every_sink() {
        let mut in_app = MockNotificationSink::new();
        let mut desktop = MockNotificationSink::new();

        in_app.expect_notify().times(1).return_const(());
        desktop.expect_notify().times(1).return_const(());

        let sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(in_app), Arc::new(desktop)];

        let notification = Notification::for_change(&change(None, OrderStatus::Pending));

        if let Some(notification) = notification {
            sinks.notify(&notification);
        }
    }
}
