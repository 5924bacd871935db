//! WebSocket frame types for the channel protocol.
//!
//! Defines the protocol between the channel hub and socket clients:
//! - Server → Client: connection established, subscription acks, channel
//!   events, pongs, errors
//! - Client → Server: subscribe, unsubscribe, ping
//!
//! Both directions derive `Serialize` and `Deserialize` so the bundled
//! socket client speaks the same types.

use serde::{Deserialize, Serialize};

use crate::domain::notification::BroadcastMessage;

// ============================================
// Server → Client Frames
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// First frame on every connection.
    ConnectionEstablished {
        socket_id: String,
        /// Seconds of silence after which the client should ping.
        activity_timeout: u64,
    },

    /// Subscription accepted; events for `channel` follow.
    SubscriptionSucceeded { channel: String },

    /// A message published on a subscribed channel.
    Event(BroadcastMessage),

    /// Heartbeat response.
    Pong,

    Error {
        code: String,
        message: String,
        /// Set when the error concerns one channel (rejected subscription).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channel: Option<String>,
    },
}

impl ServerFrame {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            code: code.to_string(),
            message: message.into(),
            channel: None,
        }
    }

    pub fn channel_error(code: &str, channel: impl Into<String>, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            code: code.to_string(),
            message: message.into(),
            channel: Some(channel.into()),
        }
    }
}

/// Error codes carried by [`ServerFrame::Error`].
pub mod error_codes {
    pub const INVALID_FRAME: &str = "INVALID_FRAME";
    pub const SUBSCRIPTION_REJECTED: &str = "SUBSCRIPTION_REJECTED";
}

// ============================================
// Client → Server Frames
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Join a channel. Private channels need `auth`.
    Subscribe {
        channel: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth: Option<String>,
    },

    Unsubscribe { channel: String },

    /// Heartbeat request.
    Ping,
}
