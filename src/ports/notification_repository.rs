//! Notification persistence port.
//!
//! Stores recorded notifications and per-recipient read markers. Every
//! authenticated user sees every notification; read state is tracked per
//! recipient.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationView};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Records a new notification.
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Newest-first list with the recipient's read state, at most `limit`
    /// entries.
    async fn list_for(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<NotificationView>, DomainError>;

    async fn exists(&self, id: &NotificationId) -> Result<bool, DomainError>;

    /// Marks one notification read for `recipient`.
    ///
    /// Returns `true` if the marker was created, `false` if it already
    /// existed. Fails with `ErrorCode::NotificationNotFound` for unknown ids.
    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
        at: Timestamp,
    ) -> Result<bool, DomainError>;

    /// Marks every notification unread by `recipient` as read. Returns the
    /// ids whose markers were created.
    async fn mark_all_read(
        &self,
        recipient: &UserId,
        at: Timestamp,
    ) -> Result<Vec<NotificationId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_repository_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn NotificationRepository>();
    }
}
