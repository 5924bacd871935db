//! MarkAllReadHandler - Marks every unread notification read for the
//! acting user.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, NotificationId, Timestamp, UserId};
use crate::domain::notification::NotificationError;
use crate::ports::NotificationRepository;

#[derive(Debug, Clone)]
pub struct MarkAllReadCommand {
    pub recipient: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkAllReadResult {
    /// Notifications this call marked, so clients patch exactly these.
    pub notification_ids: Vec<NotificationId>,
}

impl MarkAllReadResult {
    pub fn marked(&self) -> usize {
        self.notification_ids.len()
    }
}

pub struct MarkAllReadHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl MarkAllReadHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: MarkAllReadCommand,
        metadata: CommandMetadata,
    ) -> Result<MarkAllReadResult, NotificationError> {
        let notification_ids = self
            .repository
            .mark_all_read(&cmd.recipient, Timestamp::now())
            .await?;

        tracing::info!(
            recipient = %cmd.recipient,
            marked = notification_ids.len(),
            correlation_id = %metadata.correlation_id(),
            "Marked all notifications read"
        );

        Ok(MarkAllReadResult { notification_ids })
    }
}
