//! WebSocket adapters for live notification delivery.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │              PublishNotificationHandler                       │
//! │   records the notification, then calls Broadcaster            │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ broadcast
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ChannelHub                             │
//! │   Channel: notifications        Channel: private-*            │
//! │   ├── socket-a                  └── socket-c                  │
//! │   └── socket-b                                                │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ ServerFrame::Event
//!                              ▼
//!                     connected socket clients
//! ```
//!
//! # Components
//!
//! - [`messages`] - Socket frame protocol types
//! - [`hub`] - Channel registry and fan-out
//! - [`channel_auth`] - Private channel signatures
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod channel_auth;
pub mod handler;
pub mod hub;
pub mod messages;

pub use channel_auth::{ChannelAuthError, ChannelAuthenticator, PRIVATE_PREFIX};
pub use handler::{socket_router, ws_handler, SocketState};
pub use hub::{ChannelHub, SocketId};
pub use messages::{error_codes, ClientFrame, ServerFrame};
