//! HTTP handlers for notification endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::notification::{
    ListNotificationsHandler, ListNotificationsQuery, MarkAllReadCommand, MarkAllReadHandler,
    MarkReadCommand, MarkReadHandler,
};
use crate::domain::foundation::{CommandMetadata, NotificationId};
use crate::domain::notification::NotificationError;

use super::dto::{
    ListNotificationsParams, MarkAllReadResponse, MarkReadRequest, MarkReadResponse,
    NotificationListResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NotificationHandlers {
    list_handler: Arc<ListNotificationsHandler>,
    mark_read_handler: Arc<MarkReadHandler>,
    mark_all_read_handler: Arc<MarkAllReadHandler>,
}

impl NotificationHandlers {
    pub fn new(
        list_handler: Arc<ListNotificationsHandler>,
        mark_read_handler: Arc<MarkReadHandler>,
        mark_all_read_handler: Arc<MarkAllReadHandler>,
    ) -> Self {
        Self {
            list_handler,
            mark_read_handler,
            mark_all_read_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /employee/notifications - Authoritative list for the caller
pub async fn list_notifications(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListNotificationsParams>,
) -> Response {
    let query = ListNotificationsQuery {
        recipient: user.id,
        limit: params.limit,
    };

    match handlers.list_handler.handle(query).await {
        Ok(views) => {
            let response: NotificationListResponse = views.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_notification_error(e),
    }
}

/// POST /employee/notifications/mark-read - Mark one notification read
pub async fn mark_read(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<MarkReadRequest>,
) -> Response {
    let notification_id = match req.notification_id.parse::<NotificationId>() {
        Ok(id) => id,
        Err(_) => {
            return ErrorResponse::bad_request("Invalid notification ID")
                .with_status(StatusCode::BAD_REQUEST)
        }
    };

    let cmd = MarkReadCommand {
        notification_id,
        recipient: user.id.clone(),
    };
    let metadata = CommandMetadata::for_user(user.id).with_source("http");

    match handlers.mark_read_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = MarkReadResponse {
                notification_id: result.notification_id.to_string(),
                changed: result.changed,
                message: if result.changed {
                    "Notification marked as read".to_string()
                } else {
                    "Notification was already read".to_string()
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_notification_error(e),
    }
}

/// POST /employee/notifications/mark-all-read - Mark everything read
pub async fn mark_all_read(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let cmd = MarkAllReadCommand {
        recipient: user.id.clone(),
    };
    let metadata = CommandMetadata::for_user(user.id).with_source("http");

    match handlers.mark_all_read_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let response = MarkAllReadResponse {
                marked: result.marked(),
                notification_ids: result.notification_ids,
                message: "All notifications marked as read".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_notification_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_notification_error(error: NotificationError) -> Response {
    match error {
        NotificationError::NotFound(id) => ErrorResponse::not_found("Notification", &id.to_string())
            .with_status(StatusCode::NOT_FOUND),
        NotificationError::Forbidden => {
            ErrorResponse::forbidden("Permission denied").with_status(StatusCode::FORBIDDEN)
        }
        NotificationError::ValidationFailed { field, message } => ErrorResponse::bad_request(
            format!("Validation failed for {}: {}", field, message),
        )
        .with_status(StatusCode::BAD_REQUEST),
        NotificationError::Infrastructure(msg) => {
            tracing::error!("Notification request failed: {}", msg);
            ErrorResponse::internal("Internal server error")
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
