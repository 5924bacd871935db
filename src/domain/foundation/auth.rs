//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a bearer token.
//! Any token issuer can populate them via the `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: Option<String>,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Returns the display name, then email, then the raw id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn label_prefers_display_name() {
        let user = AuthenticatedUser::new(
            user_id(),
            Some("ana@example.com".to_string()),
            Some("Ana Reyes".to_string()),
        );
        assert_eq!(user.label(), "Ana Reyes");
    }

    #[test]
    fn label_falls_back_to_email_then_id() {
        let with_email = AuthenticatedUser::new(user_id(), Some("ana@example.com".to_string()), None);
        assert_eq!(with_email.label(), "ana@example.com");

        let bare = AuthenticatedUser::new(user_id(), None, None);
        assert_eq!(bare.label(), "user-123");
    }

    #[test]
    fn reauthentication_required_for_token_problems_only() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
