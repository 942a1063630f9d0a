//! Orders
//!
//! Realtime order status changes and the notifications they trigger.

pub mod events;
pub mod notifier;
pub mod records;

pub use events::{OrderChange, OrderEvents, OrderEventsError, PgOrderEvents, Subscription};
pub use notifier::{Notification, NotificationSink, OrderNotifier, TracingSink};
