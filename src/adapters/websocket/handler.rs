//! WebSocket upgrade handler for channel subscriptions.
//!
//! Connection lifecycle:
//! 1. Check the app key in the path
//! 2. Upgrade and send `connection_established`
//! 3. Process subscribe / unsubscribe / ping frames
//! 4. Forward channel events to the socket until either side goes away
//! 5. Drop the socket's subscriptions from the hub

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::domain::notification::BroadcastMessage;

use super::channel_auth::ChannelAuthenticator;
use super::hub::{ChannelHub, SocketId};
use super::messages::{error_codes, ClientFrame, ServerFrame};

const OUTBOUND_BUFFER: usize = 64;

/// Forwarding task per joined channel.
type Forwarders = Arc<Mutex<HashMap<String, JoinHandle<()>>>>;

/// State required for socket handling.
#[derive(Clone)]
pub struct SocketState {
    pub hub: Arc<ChannelHub>,
    pub authenticator: Arc<ChannelAuthenticator>,
    pub activity_timeout_secs: u64,
}

impl SocketState {
    pub fn new(hub: Arc<ChannelHub>, authenticator: Arc<ChannelAuthenticator>) -> Self {
        Self {
            hub,
            authenticator,
            activity_timeout_secs: 120,
        }
    }

    pub fn with_activity_timeout(mut self, secs: u64) -> Self {
        self.activity_timeout_secs = secs;
        self
    }
}

/// Route: `GET /app/:app_key`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(app_key): Path<String>,
    State(state): State<SocketState>,
) -> Response {
    if app_key != state.authenticator.app_key() {
        tracing::warn!(app_key = %app_key, "Socket connection for unknown app key");
        return (StatusCode::NOT_FOUND, "Unknown application").into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SocketState) {
    let (mut sink, mut stream) = socket.split();
    let socket_id = SocketId::new();
    state.hub.register(&socket_id).await;
    tracing::debug!(socket_id = %socket_id, "Socket connected");

    let (out_tx, mut out_rx) = mpsc::channel::<ServerFrame>(OUTBOUND_BUFFER);
    let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

    let established = ServerFrame::ConnectionEstablished {
        socket_id: socket_id.to_string(),
        activity_timeout: state.activity_timeout_secs,
    };
    if send_frame(&mut sink, &established).await.is_err() {
        tracing::debug!(socket_id = %socket_id, "Client left before handshake");
        state.hub.disconnect(&socket_id).await;
        return;
    }

    let mut send_task = {
        let socket_id = socket_id.clone();
        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                if let Err(e) = send_frame(&mut sink, &frame).await {
                    tracing::debug!(socket_id = %socket_id, "Send error, closing connection: {}", e);
                    break;
                }
            }
        })
    };

    let mut recv_task = {
        let state = state.clone();
        let socket_id = socket_id.clone();
        let forwarders = forwarders.clone();
        tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        handle_text(&text, &socket_id, &state, &out_tx, &forwarders).await;
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(socket_id = %socket_id, "Received unsupported binary frame");
                    }
                    // Protocol-level ping/pong is answered by axum.
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(socket_id = %socket_id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(socket_id = %socket_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let handles: Vec<JoinHandle<()>> = forwarders.lock().await.drain().map(|(_, h)| h).collect();
    for handle in handles {
        handle.abort();
        let _ = handle.await;
    }
    state.hub.disconnect(&socket_id).await;
    tracing::debug!(socket_id = %socket_id, "Socket disconnected");
}

async fn handle_text(
    text: &str,
    socket_id: &SocketId,
    state: &SocketState,
    out_tx: &mpsc::Sender<ServerFrame>,
    forwarders: &Forwarders,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            let _ = out_tx
                .send(ServerFrame::error(error_codes::INVALID_FRAME, e.to_string()))
                .await;
            return;
        }
    };

    match frame {
        ClientFrame::Subscribe { channel, auth } => {
            if let Err(err) =
                state
                    .authenticator
                    .authorize_subscription(socket_id.as_str(), &channel, auth.as_deref())
            {
                tracing::warn!(socket_id = %socket_id, channel = %channel, "Subscription rejected: {}", err);
                let _ = out_tx
                    .send(ServerFrame::channel_error(
                        error_codes::SUBSCRIPTION_REJECTED,
                        channel,
                        err.to_string(),
                    ))
                    .await;
                return;
            }

            let mut forwarders = forwarders.lock().await;
            if !forwarders.contains_key(&channel) {
                let receiver = state.hub.subscribe(&channel, socket_id).await;
                let task = tokio::spawn(forward(
                    receiver,
                    out_tx.clone(),
                    socket_id.clone(),
                    channel.clone(),
                ));
                forwarders.insert(channel.clone(), task);
            }
            drop(forwarders);

            tracing::debug!(socket_id = %socket_id, channel = %channel, "Subscribed");
            let _ = out_tx
                .send(ServerFrame::SubscriptionSucceeded { channel })
                .await;
        }
        ClientFrame::Unsubscribe { channel } => {
            let task = forwarders.lock().await.remove(&channel);
            if let Some(task) = task {
                task.abort();
                let _ = task.await;
            }
            state.hub.unsubscribe(socket_id, &channel).await;
            tracing::debug!(socket_id = %socket_id, channel = %channel, "Unsubscribed");
        }
        ClientFrame::Ping => {
            let _ = out_tx.send(ServerFrame::Pong).await;
        }
    }
}

/// Copies channel messages into the socket's outbound queue.
async fn forward(
    mut receiver: broadcast::Receiver<BroadcastMessage>,
    out_tx: mpsc::Sender<ServerFrame>,
    socket_id: SocketId,
    channel: String,
) {
    loop {
        match receiver.recv().await {
            Ok(message) => {
                if out_tx.send(ServerFrame::Event(message)).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(
                    socket_id = %socket_id,
                    channel = %channel,
                    skipped,
                    "Subscriber lagged; messages dropped"
                );
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    frame: &ServerFrame,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(frame).map_err(axum::Error::new)?;
    sink.send(Message::Text(json)).await
}

/// Router for the socket endpoint.
pub fn socket_router() -> Router<SocketState> {
    Router::new().route("/app/:app_key", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn state() -> SocketState {
        SocketState::new(
            Arc::new(ChannelHub::default()),
            Arc::new(ChannelAuthenticator::new(
                "app-key",
                SecretString::new("secret".to_string()),
            )),
        )
    }

    #[test]
    fn socket_state_shares_hub() {
        let hub = Arc::new(ChannelHub::default());
        let state = SocketState::new(
            hub.clone(),
            Arc::new(ChannelAuthenticator::new("k", SecretString::new("s".to_string()))),
        )
        .with_activity_timeout(30);

        assert!(Arc::ptr_eq(&state.hub, &hub));
        assert_eq!(state.activity_timeout_secs, 30);
    }

    #[tokio::test]
    async fn ping_frame_is_answered_with_pong() {
        let state = state();
        let (tx, mut rx) = mpsc::channel(4);
        let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

        handle_text(r#"{"type":"ping"}"#, &SocketId::new(), &state, &tx, &forwarders).await;

        assert_eq!(rx.recv().await, Some(ServerFrame::Pong));
    }

    #[tokio::test]
    async fn garbage_frame_yields_error() {
        let state = state();
        let (tx, mut rx) = mpsc::channel(4);
        let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

        handle_text("not json", &SocketId::new(), &state, &tx, &forwarders).await;

        match rx.recv().await {
            Some(ServerFrame::Error { code, .. }) => assert_eq!(code, error_codes::INVALID_FRAME),
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[tokio::test]
    async fn subscribe_acks_then_forwards_events() {
        let state = state();
        let socket_id = SocketId::new();
        let (tx, mut rx) = mpsc::channel(4);
        let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

        handle_text(
            r#"{"type":"subscribe","channel":"notifications"}"#,
            &socket_id,
            &state,
            &tx,
            &forwarders,
        )
        .await;

        assert_eq!(
            rx.recv().await,
            Some(ServerFrame::SubscriptionSucceeded {
                channel: "notifications".to_string()
            })
        );
        assert_eq!(state.hub.subscriber_count("notifications").await, 1);

        let message = BroadcastMessage {
            event_name: "EvaluationSubmitted".to_string(),
            channel: "notifications".to_string(),
            payload: serde_json::json!({"type": "evaluation"}),
            notification_id: None,
        };
        state.hub.publish(message.clone()).await;

        assert_eq!(rx.recv().await, Some(ServerFrame::Event(message)));
    }

    #[tokio::test]
    async fn private_subscribe_without_auth_is_rejected() {
        let state = state();
        let (tx, mut rx) = mpsc::channel(4);
        let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

        handle_text(
            r#"{"type":"subscribe","channel":"private-hr"}"#,
            &SocketId::new(),
            &state,
            &tx,
            &forwarders,
        )
        .await;

        match rx.recv().await {
            Some(ServerFrame::Error { code, .. }) => {
                assert_eq!(code, error_codes::SUBSCRIPTION_REJECTED)
            }
            other => panic!("unexpected frame {:?}", other),
        }
        assert_eq!(state.hub.subscriber_count("private-hr").await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_drops_forwarder() {
        let state = state();
        let socket_id = SocketId::new();
        let (tx, mut rx) = mpsc::channel(4);
        let forwarders: Forwarders = Arc::new(Mutex::new(HashMap::new()));

        handle_text(
            r#"{"type":"subscribe","channel":"notifications"}"#,
            &socket_id,
            &state,
            &tx,
            &forwarders,
        )
        .await;
        let _ack = rx.recv().await;

        handle_text(
            r#"{"type":"unsubscribe","channel":"notifications"}"#,
            &socket_id,
            &state,
            &tx,
            &forwarders,
        )
        .await;

        assert!(forwarders.lock().await.is_empty());
        assert!(state.hub.active_channels().await.is_empty());
    }
}
