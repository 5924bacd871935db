//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (JWT, mock)
//! - `broadcast` - Broker drivers (Redis, log, recording)
//! - `websocket` - In-process channel hub and socket endpoint
//! - `http` - axum routes for the notification endpoints
//! - `postgres` - Notification and employee persistence
//! - `storage` - In-memory persistence
//! - `socket_client` - Subscriber-side socket and HTTP clients

pub mod auth;
pub mod broadcast;
pub mod http;
pub mod postgres;
pub mod socket_client;
pub mod storage;
pub mod websocket;
