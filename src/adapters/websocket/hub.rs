//! In-process channel hub for socket fan-out.
//!
//! Channels are created on first subscription and removed when their last
//! subscriber leaves.
//!
//! ```text
//! Channel: notifications    Channel: private-hr
//! ├── socket-a              └── socket-c
//! ├── socket-b
//! └── socket-c
//! ```
//!
//! Each channel is a bounded `broadcast` channel. A subscriber that falls
//! more than `channel_capacity` messages behind loses the oldest ones.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::notification::BroadcastMessage;
use crate::ports::{BroadcastError, Broadcaster};

/// Server-assigned identifier of a socket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketId(String);

impl SocketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of channels and the sockets subscribed to them.
///
/// `RwLock` because publishes (reads) far outnumber subscribe/unsubscribe
/// (writes).
pub struct ChannelHub {
    /// channel name → sender for that channel.
    channels: RwLock<HashMap<String, broadcast::Sender<BroadcastMessage>>>,

    /// socket → channels it joined, for cleanup on disconnect.
    sockets: RwLock<HashMap<SocketId, HashSet<String>>>,

    channel_capacity: usize,
}

impl ChannelHub {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            sockets: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Tracks a newly connected socket.
    pub async fn register(&self, socket_id: &SocketId) {
        self.sockets
            .write()
            .await
            .entry(socket_id.clone())
            .or_default();
    }

    /// Joins `socket_id` to `channel`, creating the channel if needed.
    pub async fn subscribe(
        &self,
        channel: &str,
        socket_id: &SocketId,
    ) -> broadcast::Receiver<BroadcastMessage> {
        let receiver = {
            let mut channels = self.channels.write().await;
            let sender = channels.entry(channel.to_string()).or_insert_with(|| {
                let (tx, _) = broadcast::channel(self.channel_capacity);
                tx
            });
            sender.subscribe()
        };

        self.sockets
            .write()
            .await
            .entry(socket_id.clone())
            .or_default()
            .insert(channel.to_string());

        receiver
    }

    /// Removes one channel membership. The caller drops its receiver first.
    pub async fn unsubscribe(&self, socket_id: &SocketId, channel: &str) {
        if let Some(joined) = self.sockets.write().await.get_mut(socket_id) {
            joined.remove(channel);
        }
        self.prune(&[channel.to_string()]).await;
    }

    /// Forgets the socket and prunes channels left without subscribers.
    pub async fn disconnect(&self, socket_id: &SocketId) {
        let joined = self.sockets.write().await.remove(socket_id);
        if let Some(joined) = joined {
            let joined: Vec<String> = joined.into_iter().collect();
            self.prune(&joined).await;
        }
    }

    async fn prune(&self, channels: &[String]) {
        let mut registry = self.channels.write().await;
        for channel in channels {
            let empty = registry
                .get(channel)
                .map(|sender| sender.receiver_count() == 0)
                .unwrap_or(false);
            if empty {
                registry.remove(channel);
                tracing::debug!(channel = %channel, "Removed empty channel");
            }
        }
    }

    /// Sends to every current subscriber of `message.channel`.
    ///
    /// Returns the number of subscribers reached; zero when nobody is
    /// listening.
    pub async fn publish(&self, message: BroadcastMessage) -> usize {
        let channels = self.channels.read().await;
        match channels.get(&message.channel) {
            // Err only means no live receivers.
            Some(sender) => sender.send(message).unwrap_or(0),
            None => 0,
        }
    }

    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub async fn active_channels(&self) -> Vec<String> {
        self.channels.read().await.keys().cloned().collect()
    }

    pub async fn connection_count(&self) -> usize {
        self.sockets.read().await.len()
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl Broadcaster for ChannelHub {
    async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError> {
        let channel = message.channel.clone();
        let reached = self.publish(message).await;
        tracing::debug!(channel = %channel, reached, "Published to channel hub");
        Ok(reached)
    }

    fn name(&self) -> &'static str {
        "hub"
    }
}
