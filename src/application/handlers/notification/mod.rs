//! Notification command and query handlers.

mod list_notifications;
mod mark_all_read;
mod mark_read;
mod publish_notification;
mod raise_notification;

pub use list_notifications::{ListNotificationsHandler, ListNotificationsQuery};
pub use mark_all_read::{MarkAllReadCommand, MarkAllReadHandler, MarkAllReadResult};
pub use mark_read::{MarkReadCommand, MarkReadHandler, MarkReadResult};
pub use publish_notification::{
    BroadcastOutcome, PublishNotificationCommand, PublishNotificationHandler,
    PublishNotificationResult,
};
pub use raise_notification::RaiseNotificationHandler;
