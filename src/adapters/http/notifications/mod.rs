//! Notification HTTP endpoints.
//!
//! - `GET  /employee/notifications`
//! - `POST /employee/notifications/mark-read`
//! - `POST /employee/notifications/mark-all-read`

pub mod dto;
mod handlers;
mod routes;

pub use handlers::NotificationHandlers;
pub use routes::notification_routes;
