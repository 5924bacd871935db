//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod notification;

pub use notification::{
    BroadcastOutcome, ListNotificationsHandler, ListNotificationsQuery, MarkAllReadCommand,
    MarkAllReadHandler, MarkAllReadResult, MarkReadCommand, MarkReadHandler, MarkReadResult,
    PublishNotificationCommand, PublishNotificationHandler, PublishNotificationResult,
    RaiseNotificationHandler,
};
