//! HTTP DTOs for notification endpoints.
//!
//! Shared by the server handlers and the `reqwest` client adapter, so both
//! sides agree on the wire shape.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp};
use crate::domain::notification::{
    Notification, NotificationEvent, NotificationKind, NotificationView,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub notification_id: String,
}

/// Body of `POST /broadcasting/auth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAuthRequest {
    pub socket_id: String,
    pub channel_name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub event_name: String,
    pub payload: NotificationEvent,
    pub created_at: Timestamp,
    #[serde(default)]
    pub read_at: Option<Timestamp>,
    pub read: bool,
}

impl From<NotificationView> for NotificationResponse {
    fn from(view: NotificationView) -> Self {
        let read = view.is_read();
        let notification = view.notification;
        Self {
            id: notification.id,
            kind: notification.kind(),
            event_name: notification.event.event_name().to_string(),
            payload: notification.event,
            created_at: notification.created_at,
            read_at: view.read_at,
            read,
        }
    }
}

impl NotificationResponse {
    pub fn into_view(self) -> NotificationView {
        NotificationView {
            notification: Notification::reconstitute(self.id, self.payload, self.created_at),
            read_at: self.read_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: usize,
}

impl From<Vec<NotificationView>> for NotificationListResponse {
    fn from(views: Vec<NotificationView>) -> Self {
        let unread_count = views.iter().filter(|view| !view.is_read()).count();
        Self {
            notifications: views.into_iter().map(Into::into).collect(),
            unread_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub notification_id: String,
    /// False when it was already read.
    pub changed: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub marked: usize,
    /// Exactly the notifications this call marked.
    pub notification_ids: Vec<NotificationId>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAuthResponse {
    pub auth: String,
}
