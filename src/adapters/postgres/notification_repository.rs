//! PostgreSQL implementation of NotificationRepository.
//!
//! Notifications live in `notifications`; per-recipient read markers live in
//! `notification_reads` keyed by (notification_id, recipient_id).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationEvent, NotificationView};
use crate::ports::NotificationRepository;

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, notification_type, event_name, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.kind().as_str())
        .bind(notification.event.event_name())
        .bind(Json(&notification.event))
        .bind(notification.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert notification: {}", e),
            )
        })?;

        Ok(())
    }

    async fn list_for(
        &self,
        recipient: &UserId,
        limit: usize,
    ) -> Result<Vec<NotificationView>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.payload, n.created_at, r.read_at
            FROM notifications n
            LEFT JOIN notification_reads r
                ON r.notification_id = n.id AND r.recipient_id = $1
            ORDER BY n.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list notifications: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_view).collect()
    }

    async fn exists(&self, id: &NotificationId) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check notification existence: {}", e),
                )
            })?;

        Ok(result.0 > 0)
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

        let result = sqlx::query(
            r#"
            INSERT INTO notification_reads (notification_id, recipient_id, read_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (notification_id, recipient_id) DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(recipient.as_str())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark notification read: {}", e),
            )
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_all_read(
        &self,
        recipient: &UserId,
        at: Timestamp,
    ) -> Result<Vec<NotificationId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO notification_reads (notification_id, recipient_id, read_at)
            SELECT n.id, $1, $2
            FROM notifications n
            ON CONFLICT (notification_id, recipient_id) DO NOTHING
            RETURNING notification_id
            "#,
        )
        .bind(recipient.as_str())
        .bind(at.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark all notifications read: {}", e),
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|(id,)| NotificationId::from_uuid(id))
            .collect())
    }
}

fn row_to_view(row: PgRow) -> Result<NotificationView, DomainError> {
    let decode = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to decode notification row: {}", e),
        )
    };

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let Json(event): Json<NotificationEvent> = row.try_get("payload").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let read_at: Option<DateTime<Utc>> = row.try_get("read_at").map_err(decode)?;

    Ok(NotificationView {
        notification: Notification::reconstitute(
            NotificationId::from_uuid(id),
            event,
            Timestamp::from_datetime(created_at),
        ),
        read_at: read_at.map(Timestamp::from_datetime),
    })
}
