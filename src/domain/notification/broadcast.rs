//! Wire envelope published on the notifications channel.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NotificationId;

use super::event::NotificationEvent;
use super::notification::Notification;

/// Channel every HR notification is published on.
pub const NOTIFICATIONS_CHANNEL: &str = "notifications";

/// A serialized event ready for the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub event_name: String,
    pub channel: String,
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<NotificationId>,
}

impl BroadcastMessage {
    /// Envelope for a bare event on the notifications channel.
    pub fn from_event(event: &NotificationEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_name: event.event_name().to_string(),
            channel: NOTIFICATIONS_CHANNEL.to_string(),
            payload: serde_json::to_value(event)?,
            notification_id: None,
        })
    }

    /// Envelope for a recorded notification, carrying its id so clients can
    /// mark it read.
    pub fn for_notification(notification: &Notification) -> Result<Self, serde_json::Error> {
        let mut message = Self::from_event(&notification.event)?;
        message.notification_id = Some(notification.id);
        Ok(message)
    }

    /// Decodes the payload back into a typed event.
    pub fn decode_event(&self) -> Result<NotificationEvent, serde_json::Error> {
        NotificationEvent::deserialize(&self.payload)
    }
}
