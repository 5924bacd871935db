//! ListNotificationsHandler - Query handler for a recipient's notifications.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::notification::{NotificationError, NotificationView};
use crate::ports::NotificationRepository;

/// Query for the newest notifications with the recipient's read state.
#[derive(Debug, Clone)]
pub struct ListNotificationsQuery {
    pub recipient: UserId,
    /// Falls back to the handler's default when absent.
    pub limit: Option<usize>,
}

impl ListNotificationsQuery {
    pub fn for_recipient(recipient: UserId) -> Self {
        Self {
            recipient,
            limit: None,
        }
    }
}

pub struct ListNotificationsHandler {
    repository: Arc<dyn NotificationRepository>,
    default_limit: usize,
    max_limit: usize,
}

impl ListNotificationsHandler {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            repository,
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub async fn handle(
        &self,
        query: ListNotificationsQuery,
    ) -> Result<Vec<NotificationView>, NotificationError> {
        let limit = match query.limit {
            None => self.default_limit,
            Some(0) => {
                return Err(NotificationError::validation("limit", "must be at least 1"));
            }
            Some(limit) if limit > self.max_limit => {
                return Err(NotificationError::validation(
                    "limit",
                    format!("must be at most {}", self.max_limit),
                ));
            }
            Some(limit) => limit,
        };

        let views = self.repository.list_for(&query.recipient, limit).await?;
        Ok(views)
    }
}
