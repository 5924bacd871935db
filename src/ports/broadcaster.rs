//! Broadcaster port - publishing notification envelopes to a pub/sub broker.
//!
//! Delivery is best-effort and at-most-once. Implementations publish the
//! message and return without waiting for subscribers; there is no retry and
//! no receipt. Clients that are not connected when a message is published
//! never see it over the socket.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::BroadcastMessage;

/// Errors that can occur while publishing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("Failed to serialize broadcast payload: {0}")]
    Serialization(String),

    #[error("Broker unavailable: {0}")]
    Unavailable(String),

    #[error("Channel '{0}' is closed")]
    ChannelClosed(String),
}

impl From<serde_json::Error> for BroadcastError {
    fn from(err: serde_json::Error) -> Self {
        BroadcastError::Serialization(err.to_string())
    }
}

/// Port for pushing messages to connected clients.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Publishes a message on `message.channel`.
    ///
    /// Returns the number of subscribers the broker reports as reached, or
    /// zero when the broker does not report it.
    async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError>;

    /// Driver name for logging.
    fn name(&self) -> &'static str;
}
