use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp};

use super::event::{NotificationEvent, NotificationKind};

/// A persisted notification. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub event: NotificationEvent,
    pub created_at: Timestamp,
}

impl Notification {
    /// Records a new notification for `event` with a fresh id.
    pub fn record(event: impl Into<NotificationEvent>) -> Self {
        Self {
            id: NotificationId::new(),
            event: event.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a notification from storage or the wire.
    pub fn reconstitute(id: NotificationId, event: NotificationEvent, created_at: Timestamp) -> Self {
        Self {
            id,
            event,
            created_at,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.event.kind()
    }
}

/// A notification as seen by one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub notification: Notification,
    pub read_at: Option<Timestamp>,
}

impl NotificationView {
    pub fn unread(notification: Notification) -> Self {
        Self {
            notification,
            read_at: None,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.notification.id
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
