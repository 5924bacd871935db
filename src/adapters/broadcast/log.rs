//! Broadcaster that only logs.
//!
//! Used when no broker is configured; live updates are disabled but the
//! notification is still recorded and visible through the list endpoint.

use async_trait::async_trait;

use crate::domain::notification::BroadcastMessage;
use crate::ports::{BroadcastError, Broadcaster};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogBroadcaster;

impl LogBroadcaster {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Broadcaster for LogBroadcaster {
    async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError> {
        let payload = serde_json::to_string(&message.payload)?;
        tracing::info!(
            channel = %message.channel,
            event_name = %message.event_name,
            notification_id = ?message.notification_id,
            payload = %payload,
            "Broadcast (log driver)"
        );
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn log_driver_reaches_nobody() {
        let message = BroadcastMessage {
            event_name: "AbsenceRequested".to_string(),
            channel: "notifications".to_string(),
            payload: json!({"type": "absence_request"}),
            notification_id: None,
        };
        assert_eq!(LogBroadcaster::new().broadcast(message).await, Ok(0));
    }
}
