//! In-memory notification repository.
//!
//! Used for development runs without a database and for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationView};
use crate::ports::NotificationRepository;

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
    reads: RwLock<HashMap<(NotificationId, UserId), Timestamp>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        let mut notifications = self.notifications.write().await;
        if notifications.iter().any(|n| n.id == notification.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Duplicate notification id: {}", notification.id),
            ));
        }
        notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<NotificationView>, DomainError> {
        let notifications = self.notifications.read().await;
        let reads = self.reads.read().await;

        let mut newest_first: Vec<&Notification> = notifications.iter().collect();
        // Stable sort keeps insertion order for equal timestamps; reverse
        // afterwards so later inserts come first.
        newest_first.sort_by_key(|n| n.created_at);
        newest_first.reverse();

        Ok(newest_first
            .into_iter()
            .take(limit)
            .map(|n| NotificationView {
                notification: n.clone(),
                read_at: reads.get(&(n.id, recipient.clone())).copied(),
            })
            .collect())
    }

    async fn exists(&self, id: &NotificationId) -> Result<bool, DomainError> {
        Ok(self.notifications.read().await.iter().any(|n| &n.id == id))
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
        at: Timestamp,
    ) -> Result<bool, DomainError> {
        if !self.exists(id).await? {
            return Err(DomainError::new(
                ErrorCode::NotificationNotFound,
                format!("Notification not found: {}", id),
            ));
        }

        let mut reads = self.reads.write().await;
        let key = (*id, recipient.clone());
        if reads.contains_key(&key) {
            return Ok(false);
        }
        reads.insert(key, at);
        Ok(true)
    }

    async fn mark_all_read(
        &self,
        recipient: &UserId,
        at: Timestamp,
    ) -> Result<Vec<NotificationId>, DomainError> {
        let notifications = self.notifications.read().await;
        let mut reads = self.reads.write().await;

        let mut created = Vec::new();
        for notification in notifications.iter() {
            let key = (notification.id, recipient.clone());
            if !reads.contains_key(&key) {
                reads.insert(key, at);
                created.push(notification.id);
            }
        }
        Ok(created)
    }
}
