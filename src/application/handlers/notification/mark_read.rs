//! MarkReadHandler - Marks one notification read for the acting user.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, ErrorCode, NotificationId, Timestamp, UserId};
use crate::domain::notification::NotificationError;
use crate::ports::NotificationRepository;

#[derive(Debug, Clone)]
pub struct MarkReadCommand {
    pub notification_id: NotificationId,
    pub recipient: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkReadResult {
    pub notification_id: NotificationId,
    /// False when the notification was already read.
    pub changed: bool,
}

pub struct MarkReadHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl MarkReadHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: MarkReadCommand,
        metadata: CommandMetadata,
    ) -> Result<MarkReadResult, NotificationError> {
        let changed = self
            .repository
            .mark_read(&cmd.notification_id, &cmd.recipient, Timestamp::now())
            .await
            .map_err(|e| match e.code {
                ErrorCode::NotificationNotFound => NotificationError::not_found(cmd.notification_id),
                _ => e.into(),
            })?;

        tracing::debug!(
            notification_id = %cmd.notification_id,
            recipient = %cmd.recipient,
            changed,
            correlation_id = %metadata.correlation_id(),
            "Marked notification read"
        );

        Ok(MarkReadResult {
            notification_id: cmd.notification_id,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryNotificationRepository;
    use crate::domain::foundation::{EmployeeId, EvaluationId};
    use crate::domain::notification::{EvaluationSubmitted, Notification};

    fn hr() -> UserId {
        UserId::new("hr-1").unwrap()
    }

    async fn setup() -> (MarkReadHandler, NotificationId) {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let notification = Notification::record(EvaluationSubmitted {
            evaluation_id: EvaluationId::new(1),
            employee_id: EmployeeId::new(1),
            employee_name: "Sam Lee".to_string(),
        });
        repository.save(&notification).await.unwrap();
        (MarkReadHandler::new(repository), notification.id)
    }

    #[tokio::test]
    async fn second_mark_is_a_no_op() {
        let (handler, id) = setup().await;
        let cmd = MarkReadCommand {
            notification_id: id,
            recipient: hr(),
        };

        let first = handler
            .handle(cmd.clone(), CommandMetadata::for_user(hr()))
            .await
            .unwrap();
        let second = handler
            .handle(cmd, CommandMetadata::for_user(hr()))
            .await
            .unwrap();

        assert!(first.changed);
        assert!(!second.changed);
    }

    #[tokio::test]
    async fn unknown_notification_is_not_found() {
        let (handler, _) = setup().await;
        let missing = NotificationId::new();

        let result = handler
            .handle(
                MarkReadCommand {
                    notification_id: missing,
                    recipient: hr(),
                },
                CommandMetadata::for_user(hr()),
            )
            .await;

        assert_eq!(result, Err(NotificationError::NotFound(missing)));
    }
}
