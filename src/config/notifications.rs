//! Notification list and presentation configuration

use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::notification::TitleTable;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Entries returned by the list endpoint when no limit is given.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: usize,

    /// Dropdown title overrides keyed by notification type
    /// (e.g. `WORKFORCE__NOTIFICATIONS__TITLES__EVALUATION`).
    #[serde(default)]
    pub titles: HashMap<String, String>,
}

impl NotificationsConfig {
    /// Default titles with the configured overrides applied.
    pub fn title_table(&self) -> Result<TitleTable, ValidationError> {
        TitleTable::with_overrides(&self.titles)
            .map_err(|e| ValidationError::InvalidTitle(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_list_limit == 0 || self.list_limit == 0 || self.list_limit > self.max_list_limit
        {
            return Err(ValidationError::InvalidListLimit);
        }
        self.title_table()?;
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            titles: HashMap::new(),
        }
    }
}

fn default_list_limit() -> usize {
    50
}

fn default_max_list_limit() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;

    #[test]
    fn test_defaults_are_valid() {
        assert!(NotificationsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_limit_above_max_is_rejected() {
        let config = NotificationsConfig {
            list_limit: 500,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidListLimit));
    }

    #[test]
    fn test_title_override_applies() {
        let config = NotificationsConfig {
            titles: HashMap::from([("evaluation".to_string(), "Review In".to_string())]),
            ..Default::default()
        };
        let table = config.title_table().unwrap();
        assert_eq!(table.title(NotificationKind::Evaluation), "Review In");
        assert_eq!(table.title(NotificationKind::LeaveRequest), "Leave Request Update");
    }

    #[test]
    fn test_unknown_title_key_is_rejected() {
        let config = NotificationsConfig {
            titles: HashMap::from([("payroll_run".to_string(), "Payroll".to_string())]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTitle(_))
        ));
    }
}
