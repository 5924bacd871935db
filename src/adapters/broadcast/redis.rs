//! Redis-backed broadcaster.
//!
//! Publishes the serialized envelope with `PUBLISH <prefix><channel>` so an
//! external socket server subscribed to Redis can fan it out.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::notification::BroadcastMessage;
use crate::ports::{BroadcastError, Broadcaster};

pub struct RedisBroadcaster {
    conn: MultiplexedConnection,
    channel_prefix: String,
}

impl RedisBroadcaster {
    pub fn new(conn: MultiplexedConnection, channel_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            channel_prefix: channel_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, channel_prefix: impl Into<String>) -> Result<Self, BroadcastError> {
        let client =
            redis::Client::open(url).map_err(|e| BroadcastError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| BroadcastError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn, channel_prefix))
    }
}

fn prefixed_channel(prefix: &str, channel: &str) -> String {
    format!("{}{}", prefix, channel)
}

#[async_trait]
impl Broadcaster for RedisBroadcaster {
    async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError> {
        let channel = prefixed_channel(&self.channel_prefix, &message.channel);
        let payload = serde_json::to_string(&message)?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(&channel, payload)
            .await
            .map_err(|e: redis::RedisError| BroadcastError::Unavailable(e.to_string()))?;

        tracing::debug!(channel = %channel, receivers, "Published to Redis");
        Ok(receivers.max(0) as usize)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_gets_configured_prefix() {
        assert_eq!(prefixed_channel("workforce_", "notifications"), "workforce_notifications");
        assert_eq!(prefixed_channel("", "notifications"), "notifications");
    }
}
