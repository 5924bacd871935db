//! LiveNotifications - feeds socket pushes into the notification center.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::{BroadcastMessage, NotificationKind};
use crate::ports::BroadcastHandler;

use super::notification_center::NotificationCenter;

/// Registered once per notification event name on the `notifications`
/// channel.
pub struct LiveNotifications {
    center: Arc<NotificationCenter>,
}

impl LiveNotifications {
    pub fn new(center: Arc<NotificationCenter>) -> Self {
        Self { center }
    }

    /// Event names this handler should be registered for.
    pub fn event_names() -> impl Iterator<Item = &'static str> {
        NotificationKind::ALL.into_iter().map(|kind| kind.event_name())
    }
}

#[async_trait]
impl BroadcastHandler for LiveNotifications {
    async fn handle(&self, message: BroadcastMessage) -> Result<(), DomainError> {
        if !self.center.receive(&message).await {
            tracing::debug!(
                event_name = %message.event_name,
                "Push ignored (duplicate or undecodable)"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LiveNotifications"
    }
}
