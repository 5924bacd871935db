//! Application layer - Commands, Queries, and Handlers.
//!
//! `handlers` orchestrate the server side (publish, list, mark read).
//! `client` holds the subscriber's state and presentation logic.

pub mod client;
pub mod handlers;

pub use handlers::{
    BroadcastOutcome, ListNotificationsHandler, ListNotificationsQuery, MarkAllReadCommand,
    MarkAllReadHandler, MarkAllReadResult, MarkReadCommand, MarkReadHandler, MarkReadResult,
    PublishNotificationCommand, PublishNotificationHandler, PublishNotificationResult,
    RaiseNotificationHandler,
};
