//! Notification-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId};

/// Errors raised by notification commands and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Notification does not exist.
    NotFound(NotificationId),
    /// Caller may not act on notifications.
    Forbidden,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Storage or broker failure.
    Infrastructure(String),
}

impl NotificationError {
    pub fn not_found(id: NotificationId) -> Self {
        NotificationError::NotFound(id)
    }
    pub fn forbidden() -> Self {
        NotificationError::Forbidden
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        NotificationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        NotificationError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            NotificationError::NotFound(_) => ErrorCode::NotificationNotFound,
            NotificationError::Forbidden => ErrorCode::Forbidden,
            NotificationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            NotificationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            NotificationError::NotFound(id) => format!("Notification not found: {}", id),
            NotificationError::Forbidden => "Permission denied".to_string(),
            NotificationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            NotificationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for NotificationError {}

impl From<DomainError> for NotificationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => NotificationError::Forbidden,
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                NotificationError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => NotificationError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_notification_code() {
        let id = NotificationId::new();
        let err = NotificationError::not_found(id);
        assert_eq!(err.code(), ErrorCode::NotificationNotFound);
        assert_eq!(err.to_string(), format!("Notification not found: {}", id));
    }

    #[test]
    fn database_domain_error_becomes_infrastructure() {
        let err: NotificationError =
            DomainError::new(ErrorCode::DatabaseError, "connection reset").into();
        assert!(matches!(err, NotificationError::Infrastructure(_)));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: NotificationError = DomainError::validation("limit", "too large").into();
        assert_eq!(err, NotificationError::validation("limit", "too large"));
    }
}
