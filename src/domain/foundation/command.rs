//! Command metadata shared by application handlers.
//!
//! Carries the acting user and correlation context through command
//! processing so it can be attached to log spans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command, if the command came from a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "http", "leave-workflow").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Metadata for a command issued by a user.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            correlation_id: None,
            source: None,
        }
    }

    /// Metadata for a command raised by the system (workflow, scheduler).
    pub fn system(source: impl Into<String>) -> Self {
        Self {
            user_id: None,
            correlation_id: None,
            source: Some(source.into()),
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if absent.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_correlation_id_is_preserved() {
        let metadata = CommandMetadata::system("leave-workflow").with_correlation_id("req-1");
        assert_eq!(metadata.correlation_id(), "req-1");
        assert_eq!(metadata.source(), Some("leave-workflow"));
        assert!(metadata.user_id.is_none());
    }

    #[test]
    fn correlation_id_is_generated_when_missing() {
        let metadata = CommandMetadata::for_user(UserId::new("u-1").unwrap());
        let generated = metadata.correlation_id();
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
