//! PostgreSQL adapters.
//!
//! Runtime-checked `sqlx::query` calls; the schema for notifications and
//! read markers ships in `migrations/`.

mod employee_directory;
mod notification_repository;

pub use employee_directory::PostgresEmployeeDirectory;
pub use notification_repository::PostgresNotificationRepository;
