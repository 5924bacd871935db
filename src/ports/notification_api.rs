//! Client-side view of the notification HTTP endpoints.
//!
//! The notification center and the socket client talk to the server only
//! through these traits, so they can be driven by the `reqwest` adapter in
//! production and by hand-written fakes in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::NotificationId;
use crate::domain::notification::NotificationView;

/// Failure of a client → server request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Notification not found")]
    NotFound,

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Authoritative list for the signed-in user, newest first.
    async fn list(&self) -> Result<Vec<NotificationView>, ApiError>;

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError>;

    /// Returns the ids the server marked.
    async fn mark_all_read(&self) -> Result<Vec<NotificationId>, ApiError>;
}

/// Obtains signatures for private channel subscriptions.
#[async_trait]
pub trait ChannelAuthorizer: Send + Sync {
    /// Returns the `auth` string to send with the subscribe frame.
    async fn authorize(&self, socket_id: &str, channel: &str) -> Result<String, ApiError>;
}
