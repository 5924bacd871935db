//! In-memory storage adapters.
//!
//! Used when no database URL is configured and throughout the tests.

mod in_memory_employee_directory;
mod in_memory_notification_repository;

pub use in_memory_employee_directory::InMemoryEmployeeDirectory;
pub use in_memory_notification_repository::InMemoryNotificationRepository;
