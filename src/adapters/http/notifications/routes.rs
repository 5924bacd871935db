//! HTTP routes for notification endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_notifications, mark_all_read, mark_read, NotificationHandlers};

/// Routes mounted under `/employee/notifications`.
pub fn notification_routes(handlers: NotificationHandlers) -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/mark-read", post(mark_read))
        .route("/mark-all-read", post(mark_all_read))
        .with_state(handlers)
}
