//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the notification domain.

mod auth;
mod command;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AbsenceId, EmployeeId, EvaluationId, LeaveId, NotificationId, ReturnWorkId, UserId};
pub use timestamp::Timestamp;
