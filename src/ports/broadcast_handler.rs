//! BroadcastHandler port - receiving named events from a socket channel.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::BroadcastMessage;

/// Handler registered for one event name on a subscribed channel.
///
/// Implementations should be idempotent: after a reconnect the same
/// notification may be seen again through a reload.
#[async_trait]
pub trait BroadcastHandler: Send + Sync {
    async fn handle(&self, message: BroadcastMessage) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
