//! PublishNotificationHandler - Records a notification and fans it out.
//!
//! The record is written first; the broadcast afterwards is best effort. A
//! broker failure is logged and reported in the result but never turns a
//! recorded notification into an error, so the HR workflow that raised it
//! still commits.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::notification::{
    BroadcastMessage, Notification, NotificationError, NotificationEvent,
};
use crate::ports::{Broadcaster, NotificationRepository};

/// Command to publish one notification event.
#[derive(Debug, Clone)]
pub struct PublishNotificationCommand {
    pub event: NotificationEvent,
}

/// What happened to the live broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Broker accepted the message; `reached` is its subscriber count.
    Delivered { reached: usize },
    /// Broker rejected or could not be reached.
    Failed { reason: String },
}

impl BroadcastOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, BroadcastOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PublishNotificationResult {
    pub notification: Notification,
    pub broadcast: BroadcastOutcome,
}

pub struct PublishNotificationHandler {
    repository: Arc<dyn NotificationRepository>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl PublishNotificationHandler {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// Publishes any event variant.
    pub async fn publish<E>(
        &self,
        event: E,
        metadata: CommandMetadata,
    ) -> Result<PublishNotificationResult, NotificationError>
    where
        E: Into<NotificationEvent>,
    {
        self.handle(
            PublishNotificationCommand {
                event: event.into(),
            },
            metadata,
        )
        .await
    }

    pub async fn handle(
        &self,
        cmd: PublishNotificationCommand,
        metadata: CommandMetadata,
    ) -> Result<PublishNotificationResult, NotificationError> {
        let correlation_id = metadata.correlation_id();

        // 1. Record
        let notification = Notification::record(cmd.event);
        self.repository.save(&notification).await?;

        // 2. Broadcast
        let broadcast = match BroadcastMessage::for_notification(&notification) {
            Ok(message) => match self.broadcaster.broadcast(message).await {
                Ok(reached) => {
                    tracing::info!(
                        notification_id = %notification.id,
                        event_name = notification.event.event_name(),
                        broadcaster = self.broadcaster.name(),
                        reached,
                        correlation_id = %correlation_id,
                        "Notification broadcast"
                    );
                    BroadcastOutcome::Delivered { reached }
                }
                Err(e) => {
                    tracing::warn!(
                        notification_id = %notification.id,
                        broadcaster = self.broadcaster.name(),
                        correlation_id = %correlation_id,
                        "Broadcast failed, notification is still recorded: {}",
                        e
                    );
                    BroadcastOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            },
            Err(e) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    correlation_id = %correlation_id,
                    "Could not encode broadcast: {}",
                    e
                );
                BroadcastOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(PublishNotificationResult {
            notification,
            broadcast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::broadcast::InMemoryBroadcaster;
    use crate::adapters::storage::InMemoryNotificationRepository;
    use crate::domain::foundation::{
        DomainError, EmployeeId, ErrorCode, EvaluationId, LeaveId, NotificationId, Timestamp,
        UserId,
    };
    use crate::domain::notification::{EvaluationSubmitted, LeaveRequested, NotificationView};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FailingRepository;

    #[async_trait]
    impl NotificationRepository for FailingRepository {
        async fn save(&self, _notification: &Notification) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "disk full"))
        }

        async fn list_for(
            &self,
            _recipient: &UserId,
            _limit: usize,
        ) -> Result<Vec<NotificationView>, DomainError> {
            Ok(vec![])
        }

        async fn exists(&self, _id: &NotificationId) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn mark_read(
            &self,
            _id: &NotificationId,
            _recipient: &UserId,
            _at: Timestamp,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn mark_all_read(
            &self,
            _recipient: &UserId,
            _at: Timestamp,
        ) -> Result<Vec<NotificationId>, DomainError> {
            Ok(vec![])
        }
    }

    fn leave() -> LeaveRequested {
        LeaveRequested {
            employee_id: EmployeeId::new(42),
            employee_name: "Jane Doe".to_string(),
            leave_id: LeaveId::new(7),
            leave_type: "Annual".to_string(),
            leave_start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            leave_end_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        }
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::system("leave-workflow").with_correlation_id("test")
    }

    #[tokio::test]
    async fn records_then_broadcasts() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let broadcaster = Arc::new(InMemoryBroadcaster::new());
        let handler = PublishNotificationHandler::new(repository.clone(), broadcaster.clone());

        let result = handler.publish(leave(), metadata()).await.unwrap();

        assert!(result.broadcast.is_delivered());
        assert!(repository.exists(&result.notification.id).await.unwrap());
        let published = broadcaster.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event_name, "LeaveRequested");
        assert_eq!(published[0].channel, "notifications");
        assert_eq!(published[0].notification_id, Some(result.notification.id));
    }

    #[tokio::test]
    async fn broker_failure_keeps_the_record() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let broadcaster = Arc::new(InMemoryBroadcaster::failing());
        let handler = PublishNotificationHandler::new(repository.clone(), broadcaster.clone());

        let result = handler.publish(leave(), metadata()).await.unwrap();

        assert!(matches!(result.broadcast, BroadcastOutcome::Failed { .. }));
        assert!(repository.exists(&result.notification.id).await.unwrap());
        assert_eq!(broadcaster.message_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_skips_broadcast() {
        let broadcaster = Arc::new(InMemoryBroadcaster::new());
        let handler =
            PublishNotificationHandler::new(Arc::new(FailingRepository), broadcaster.clone());

        let result = handler.publish(leave(), metadata()).await;

        assert!(matches!(result, Err(NotificationError::Infrastructure(_))));
        assert_eq!(broadcaster.message_count(), 0);
    }

    #[tokio::test]
    async fn every_variant_goes_through_the_same_path() {
        let broadcaster = Arc::new(InMemoryBroadcaster::new());
        let handler = PublishNotificationHandler::new(
            Arc::new(InMemoryNotificationRepository::new()),
            broadcaster.clone(),
        );

        handler.publish(leave(), metadata()).await.unwrap();
        handler
            .publish(
                EvaluationSubmitted {
                    employee_id: EmployeeId::new(42),
                    employee_name: "Jane Doe".to_string(),
                    evaluation_id: EvaluationId::new(3),
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(broadcaster.count_of("LeaveRequested"), 1);
        assert_eq!(broadcaster.count_of("EvaluationSubmitted"), 1);
    }
}
