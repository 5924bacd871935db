//! Subscriber-side adapters.
//!
//! - `NotificationSocket` - `tokio-tungstenite` client for the channel hub
//! - `HttpNotificationApi` - `reqwest` client for the notification endpoints
//!
//! [`connect_live_updates`] wires both into a [`NotificationCenter`]: it loads
//! the authoritative list, then subscribes to the `notifications` channel.
//! Any failure on the socket side is logged and leaves the center without
//! live updates.

mod client;
mod http_api;

pub use client::{
    ChannelSubscription, ClientError, ConnectionStatus, NotificationSocket, SocketOptions,
};
pub use http_api::HttpNotificationApi;

use std::sync::Arc;

use crate::application::client::{LiveNotifications, NotificationCenter};
use crate::domain::notification::NOTIFICATIONS_CHANNEL;
use crate::ports::ChannelAuthorizer;

/// Connected socket plus the `notifications` subscription.
pub struct LiveUpdates {
    pub socket: NotificationSocket,
    pub subscription: ChannelSubscription,
}

/// Loads the feed and starts live updates. Returns `None` when the socket
/// could not be connected or subscribed.
pub async fn connect_live_updates(
    center: Arc<NotificationCenter>,
    options: SocketOptions,
    authorizer: Option<Arc<dyn ChannelAuthorizer>>,
) -> Option<LiveUpdates> {
    if let Err(e) = center.refresh().await {
        tracing::warn!("Initial notification load failed: {}", e);
    }

    let socket = match NotificationSocket::connect(options, authorizer).await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::warn!("Live notifications unavailable: {}", e);
            return None;
        }
    };

    let handler = Arc::new(LiveNotifications::new(center));
    for event_name in LiveNotifications::event_names() {
        socket
            .listen(NOTIFICATIONS_CHANNEL, event_name, handler.clone())
            .await;
    }

    match socket.subscribe(NOTIFICATIONS_CHANNEL).await {
        Ok(subscription) => Some(LiveUpdates {
            socket,
            subscription,
        }),
        Err(e) => {
            tracing::warn!("Live notifications unavailable: {}", e);
            socket.disconnect().await;
            None
        }
    }
}
