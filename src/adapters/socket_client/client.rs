//! Socket client with channel subscriptions, heartbeat and reconnection.
//!
//! A single background task owns the WebSocket. The public handle talks to it
//! through a command channel, so `NotificationSocket` is cheap to clone and can
//! be shared by `Arc` between the bell and whatever owns the login session.
//!
//! After a dropped connection the task waits `reconnect_delay`, reconnects and
//! re-subscribes every channel that is still wanted. Events published while
//! the connection was down are gone; callers backfill through the list
//! endpoint.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::adapters::websocket::{ClientFrame, ServerFrame, PRIVATE_PREFIX};
use crate::config::BroadcastConfig;
use crate::domain::notification::BroadcastMessage;
use crate::ports::{BroadcastHandler, ChannelAuthorizer};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// channel → event name → handler
type Handlers = Arc<RwLock<HashMap<String, HashMap<String, Arc<dyn BroadcastHandler>>>>>;

type Ack = oneshot::Sender<Result<(), ClientError>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Socket handshake failed: {0}")]
    Handshake(String),

    #[error("Authorization for channel '{channel}' failed: {reason}")]
    Authorization { channel: String, reason: String },

    #[error("Subscription to '{channel}' rejected: {reason}")]
    Rejected { channel: String, reason: String },

    #[error("Timed out waiting for subscription to '{0}'")]
    Timeout(String),

    #[error("Socket is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected { socket_id: String },
    Reconnecting,
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct SocketOptions {
    pub url: String,
    pub reconnect_delay: Duration,
    /// Also bounds the wait for `connection_established`.
    pub subscribe_timeout: Duration,
    /// Silence tolerated after a ping before the connection counts as lost.
    pub pong_timeout: Duration,
    /// `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,
}

impl SocketOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: Duration::from_secs(1),
            subscribe_timeout: Duration::from_secs(5),
            pong_timeout: Duration::from_secs(30),
            max_reconnect_attempts: None,
        }
    }

    pub fn from_config(config: &BroadcastConfig) -> Self {
        Self {
            reconnect_delay: config.reconnect_delay(),
            ..Self::new(config.socket_url())
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_pong_timeout(mut self, timeout: Duration) -> Self {
        self.pong_timeout = timeout;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }
}

enum Command {
    Subscribe { channel: String, ack: Ack },
    Unsubscribe { channel: String },
    Disconnect,
}

/// Handle to the background socket task.
#[derive(Clone)]
pub struct NotificationSocket {
    inner: Arc<Inner>,
}

struct Inner {
    commands: mpsc::UnboundedSender<Command>,
    handlers: Handlers,
    status: watch::Receiver<ConnectionStatus>,
    task: Mutex<Option<JoinHandle<()>>>,
    subscribe_timeout: Duration,
}

impl NotificationSocket {
    /// Opens the connection and waits for `connection_established`.
    ///
    /// `authorizer` is only consulted for `private-` channels.
    pub async fn connect(
        options: SocketOptions,
        authorizer: Option<Arc<dyn ChannelAuthorizer>>,
    ) -> Result<Self, ClientError> {
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let established = open(&options.url, options.subscribe_timeout).await?;
        tracing::info!(url = %options.url, socket_id = %established.socket_id, "Socket connected");
        status_tx.send_replace(ConnectionStatus::Connected {
            socket_id: established.socket_id.clone(),
        });

        let handlers: Handlers = Arc::new(RwLock::new(HashMap::new()));
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let subscribe_timeout = options.subscribe_timeout;

        let driver = Driver {
            options,
            authorizer,
            handlers: handlers.clone(),
            status: status_tx,
            commands: commands_rx,
            wanted: HashSet::new(),
            pending: HashMap::new(),
            socket_id: established.socket_id.clone(),
        };
        let task = tokio::spawn(driver.run(established));

        Ok(Self {
            inner: Arc::new(Inner {
                commands: commands_tx,
                handlers,
                status: status_rx,
                task: Mutex::new(Some(task)),
                subscribe_timeout,
            }),
        })
    }

    /// Registers the handler for `event_name` on `channel`, replacing any
    /// previous one.
    pub async fn listen(
        &self,
        channel: &str,
        event_name: &str,
        handler: Arc<dyn BroadcastHandler>,
    ) {
        let mut handlers = self.inner.handlers.write().await;
        let previous = handlers
            .entry(channel.to_string())
            .or_default()
            .insert(event_name.to_string(), handler);
        if let Some(previous) = previous {
            tracing::debug!(
                channel = %channel,
                event = %event_name,
                replaced = previous.name(),
                "Replaced socket event handler"
            );
        }
    }

    /// Subscribes to `channel` and waits for the server's acknowledgement.
    pub async fn subscribe(&self, channel: &str) -> Result<ChannelSubscription, ClientError> {
        let (ack, ack_rx) = oneshot::channel();
        self.inner
            .commands
            .send(Command::Subscribe {
                channel: channel.to_string(),
                ack,
            })
            .map_err(|_| ClientError::Closed)?;

        match tokio::time::timeout(self.inner.subscribe_timeout, ack_rx).await {
            Err(_) => Err(ClientError::Timeout(channel.to_string())),
            Ok(Err(_)) => Err(ClientError::Closed),
            Ok(Ok(result)) => result.map(|()| ChannelSubscription {
                channel: channel.to_string(),
                commands: self.inner.commands.clone(),
            }),
        }
    }

    /// Closes the connection and stops reconnecting.
    pub async fn disconnect(&self) {
        let _ = self.inner.commands.send(Command::Disconnect);
        let task = self.inner.task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.status.borrow().clone()
    }

    pub fn socket_id(&self) -> Option<String> {
        match &*self.inner.status.borrow() {
            ConnectionStatus::Connected { socket_id } => Some(socket_id.clone()),
            _ => None,
        }
    }

    /// Observes every status change, e.g. to show a reconnecting indicator.
    pub fn status_changes(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status.clone()
    }

    /// Waits until the socket reports `Connected`; false on timeout or once
    /// the socket has given up.
    pub async fn wait_connected(&self, timeout: Duration) -> bool {
        let mut status = self.status_changes();
        let result = tokio::time::timeout(
            timeout,
            status.wait_for(|s| {
                matches!(
                    s,
                    ConnectionStatus::Connected { .. } | ConnectionStatus::Disconnected
                )
            }),
        )
        .await;
        matches!(result, Ok(Ok(s)) if matches!(*s, ConnectionStatus::Connected { .. }))
    }
}

/// A live subscription. Dropping it keeps the subscription; call
/// [`ChannelSubscription::unsubscribe`] to leave the channel.
#[derive(Debug)]
pub struct ChannelSubscription {
    channel: String,
    commands: mpsc::UnboundedSender<Command>,
}

impl ChannelSubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn unsubscribe(self) {
        let _ = self.commands.send(Command::Unsubscribe {
            channel: self.channel,
        });
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Subscribe { channel, .. } => write!(f, "Subscribe({})", channel),
            Command::Unsubscribe { channel } => write!(f, "Unsubscribe({})", channel),
            Command::Disconnect => write!(f, "Disconnect"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Background task
// ════════════════════════════════════════════════════════════════════════════

struct Established {
    ws: WsStream,
    socket_id: String,
    activity_timeout: u64,
}

enum Exit {
    Disconnect,
    Lost(String),
}

struct Driver {
    options: SocketOptions,
    authorizer: Option<Arc<dyn ChannelAuthorizer>>,
    handlers: Handlers,
    status: watch::Sender<ConnectionStatus>,
    commands: mpsc::UnboundedReceiver<Command>,
    /// Channels to (re)subscribe after every connect.
    wanted: HashSet<String>,
    pending: HashMap<String, Vec<Ack>>,
    socket_id: String,
}

impl Driver {
    async fn run(mut self, mut established: Established) {
        loop {
            match self.pump(established).await {
                Exit::Disconnect => break,
                Exit::Lost(reason) => {
                    tracing::warn!(socket_id = %self.socket_id, "Socket connection lost: {}", reason);
                    self.status.send_replace(ConnectionStatus::Reconnecting);
                }
            }

            match self.reconnect().await {
                Some(next) => established = next,
                None => break,
            }
        }

        for (channel, acks) in self.pending.drain() {
            tracing::debug!(channel = %channel, "Dropping pending subscription");
            for ack in acks {
                let _ = ack.send(Err(ClientError::Closed));
            }
        }
        self.status.send_replace(ConnectionStatus::Disconnected);
        tracing::info!(socket_id = %self.socket_id, "Socket disconnected");
    }

    /// Runs one connection until it drops or a disconnect is requested.
    async fn pump(&mut self, established: Established) -> Exit {
        let Established {
            ws,
            socket_id,
            activity_timeout,
        } = established;
        self.socket_id = socket_id;
        let (mut sink, mut stream) = ws.split();

        let wanted: Vec<String> = self.wanted.iter().cloned().collect();
        for channel in wanted {
            if let Err(reason) = self.send_subscribe(&mut sink, &channel).await {
                return Exit::Lost(reason);
            }
        }

        let period = Duration::from_secs(activity_timeout.max(1));
        let mut heartbeat = interval_at(Instant::now() + period, period);
        // Armed by a ping, disarmed by any inbound frame.
        let pong_deadline = tokio::time::sleep(period);
        tokio::pin!(pong_deadline);
        let mut awaiting_pong = false;

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(Command::Disconnect) => {
                        let _ = sink.send(Message::Close(None)).await;
                        return Exit::Disconnect;
                    }
                    Some(Command::Subscribe { channel, ack }) => {
                        self.wanted.insert(channel.clone());
                        self.pending.entry(channel.clone()).or_default().push(ack);
                        if let Err(reason) = self.send_subscribe(&mut sink, &channel).await {
                            return Exit::Lost(reason);
                        }
                    }
                    Some(Command::Unsubscribe { channel }) => {
                        self.wanted.remove(&channel);
                        let frame = ClientFrame::Unsubscribe { channel };
                        if let Err(reason) = send_frame(&mut sink, &frame).await {
                            return Exit::Lost(reason);
                        }
                    }
                },
                message = stream.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        awaiting_pong = false;
                        self.on_text(&text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Exit::Lost("closed by server".to_string());
                    }
                    Some(Ok(_)) => awaiting_pong = false,
                    Some(Err(e)) => return Exit::Lost(e.to_string()),
                },
                _ = heartbeat.tick() => {
                    if let Err(reason) = send_frame(&mut sink, &ClientFrame::Ping).await {
                        return Exit::Lost(reason);
                    }
                    if !awaiting_pong {
                        awaiting_pong = true;
                        pong_deadline
                            .as_mut()
                            .reset(Instant::now() + self.options.pong_timeout);
                    }
                }
                _ = &mut pong_deadline, if awaiting_pong => {
                    return Exit::Lost("pong timeout".to_string());
                }
            }
        }
    }

    /// Sleeps `reconnect_delay` between attempts. Returns `None` when a
    /// disconnect is requested or the attempt limit is reached.
    async fn reconnect(&mut self) -> Option<Established> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            if let Some(max) = self.options.max_reconnect_attempts {
                if attempt > max {
                    tracing::warn!(attempts = max, "Giving up on socket reconnection");
                    return None;
                }
            }

            if !self.wait(self.options.reconnect_delay).await {
                return None;
            }

            match open(&self.options.url, self.options.subscribe_timeout).await {
                Ok(established) => {
                    tracing::info!(
                        socket_id = %established.socket_id,
                        attempt,
                        "Socket reconnected"
                    );
                    self.status.send_replace(ConnectionStatus::Connected {
                        socket_id: established.socket_id.clone(),
                    });
                    return Some(established);
                }
                Err(e) => tracing::warn!(attempt, "Socket reconnect failed: {}", e),
            }
        }
    }

    /// Waits out `delay` while still taking commands. False on disconnect.
    async fn wait(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                command = self.commands.recv() => match command {
                    None | Some(Command::Disconnect) => return false,
                    Some(Command::Subscribe { channel, ack }) => {
                        self.wanted.insert(channel.clone());
                        self.pending.entry(channel).or_default().push(ack);
                    }
                    Some(Command::Unsubscribe { channel }) => {
                        self.wanted.remove(&channel);
                    }
                },
            }
        }
    }

    /// Err only for transport failures; authorization failures resolve the
    /// pending acks and drop the channel.
    async fn send_subscribe(&mut self, sink: &mut WsSink, channel: &str) -> Result<(), String> {
        let auth = if channel.starts_with(PRIVATE_PREFIX) {
            match self.authorize(channel).await {
                Ok(auth) => Some(auth),
                Err(e) => {
                    tracing::warn!(channel = %channel, "Private channel authorization failed: {}", e);
                    self.wanted.remove(channel);
                    self.resolve(channel, Err(e));
                    return Ok(());
                }
            }
        } else {
            None
        };

        let frame = ClientFrame::Subscribe {
            channel: channel.to_string(),
            auth,
        };
        send_frame(sink, &frame).await
    }

    async fn authorize(&self, channel: &str) -> Result<String, ClientError> {
        let authorizer = self
            .authorizer
            .as_ref()
            .ok_or_else(|| ClientError::Authorization {
                channel: channel.to_string(),
                reason: "no authorizer configured".to_string(),
            })?;
        authorizer
            .authorize(&self.socket_id, channel)
            .await
            .map_err(|e| ClientError::Authorization {
                channel: channel.to_string(),
                reason: e.to_string(),
            })
    }

    async fn on_text(&mut self, text: &str) {
        let frame = match serde_json::from_str::<ServerFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Ignoring malformed socket frame: {}", e);
                return;
            }
        };

        match frame {
            ServerFrame::Event(message) => self.dispatch(message).await,
            ServerFrame::SubscriptionSucceeded { channel } => {
                tracing::debug!(channel = %channel, "Subscription succeeded");
                self.resolve(&channel, Ok(()));
            }
            ServerFrame::Error {
                code,
                message,
                channel: Some(channel),
            } => {
                tracing::warn!(channel = %channel, code = %code, "Subscription rejected: {}", message);
                self.wanted.remove(&channel);
                let error = ClientError::Rejected {
                    channel: channel.clone(),
                    reason: message,
                };
                self.resolve(&channel, Err(error));
            }
            ServerFrame::Error { code, message, .. } => {
                tracing::warn!(code = %code, "Socket error frame: {}", message);
            }
            ServerFrame::Pong => tracing::trace!("Pong received"),
            ServerFrame::ConnectionEstablished { socket_id, .. } => {
                self.socket_id = socket_id;
            }
        }
    }

    async fn dispatch(&self, message: BroadcastMessage) {
        let handler = self
            .handlers
            .read()
            .await
            .get(&message.channel)
            .and_then(|events| events.get(&message.event_name))
            .cloned();

        let Some(handler) = handler else {
            tracing::debug!(
                channel = %message.channel,
                event = %message.event_name,
                "No handler for socket event"
            );
            return;
        };

        let event_name = message.event_name.clone();
        if let Err(e) = handler.handle(message).await {
            tracing::warn!(
                handler = handler.name(),
                event = %event_name,
                "Socket event handler failed: {}",
                e
            );
        }
    }

    fn resolve(&mut self, channel: &str, result: Result<(), ClientError>) {
        if let Some(acks) = self.pending.remove(channel) {
            for ack in acks {
                let _ = ack.send(result.clone());
            }
        }
    }
}

async fn open(url: &str, handshake_timeout: Duration) -> Result<Established, ClientError> {
    let (mut ws, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::Connect {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let first = tokio::time::timeout(handshake_timeout, ws.next())
        .await
        .map_err(|_| ClientError::Handshake("no connection_established frame".to_string()))?;

    match first {
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerFrame>(&text) {
            Ok(ServerFrame::ConnectionEstablished {
                socket_id,
                activity_timeout,
            }) => Ok(Established {
                ws,
                socket_id,
                activity_timeout,
            }),
            Ok(other) => Err(ClientError::Handshake(format!(
                "unexpected first frame: {:?}",
                other
            ))),
            Err(e) => Err(ClientError::Handshake(e.to_string())),
        },
        Some(Ok(other)) => Err(ClientError::Handshake(format!(
            "unexpected first message: {:?}",
            other
        ))),
        Some(Err(e)) => Err(ClientError::Handshake(e.to_string())),
        None => Err(ClientError::Handshake("connection closed".to_string())),
    }
}

async fn send_frame(sink: &mut WsSink, frame: &ClientFrame) -> Result<(), String> {
    let json = serde_json::to_string(frame).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json)).await.map_err(|e| e.to_string())
}
