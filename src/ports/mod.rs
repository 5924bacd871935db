//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Server-side Ports
//!
//! - `Broadcaster` - Publish notification envelopes to a pub/sub broker
//! - `NotificationRepository` - Notifications and per-recipient read state
//! - `EmployeeDirectory` - Employee lookup for producers
//! - `SessionValidator` - Bearer token validation
//!
//! ## Client-side Ports
//!
//! - `NotificationApi` - List / mark-read / mark-all-read requests
//! - `ChannelAuthorizer` - Private channel signatures
//! - `BroadcastHandler` - Receives named events from the socket

mod broadcast_handler;
mod broadcaster;
mod employee_directory;
mod notification_api;
mod notification_repository;
mod session_validator;

pub use broadcast_handler::BroadcastHandler;
pub use broadcaster::{BroadcastError, Broadcaster};
pub use employee_directory::EmployeeDirectory;
pub use notification_api::{ApiError, ChannelAuthorizer, NotificationApi};
pub use notification_repository::NotificationRepository;
pub use session_validator::SessionValidator;
