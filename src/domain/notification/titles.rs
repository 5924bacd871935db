//! Dropdown item titles per notification kind.

use std::collections::HashMap;

use crate::domain::foundation::ValidationError;

use super::event::NotificationKind;

/// Built-in title for each kind. Adding a kind without a title here is a
/// compile error.
pub fn default_title(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::LeaveRequest => "Leave Request Update",
        NotificationKind::AbsenceRequest => "Absence Request Update",
        NotificationKind::ReturnWorkRequest => "Return to Work Update",
        NotificationKind::Evaluation => "Evaluation Update",
    }
}

/// Title lookup with optional configured overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleTable {
    titles: HashMap<NotificationKind, String>,
}

impl Default for TitleTable {
    fn default() -> Self {
        let titles = NotificationKind::ALL
            .into_iter()
            .map(|kind| (kind, default_title(kind).to_string()))
            .collect();
        Self { titles }
    }
}

impl TitleTable {
    /// Applies overrides keyed by the wire `type` value.
    ///
    /// Unknown keys and blank titles are rejected.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut table = Self::default();
        for (key, title) in overrides {
            let kind: NotificationKind = key.parse()?;
            if title.trim().is_empty() {
                return Err(ValidationError::empty_field(format!("titles.{}", key)));
            }
            table.titles.insert(kind, title.clone());
        }
        table.validate()?;
        Ok(table)
    }

    /// Every kind must have a non-blank title.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for kind in NotificationKind::ALL {
            match self.titles.get(&kind) {
                Some(title) if !title.trim().is_empty() => {}
                _ => return Err(ValidationError::empty_field(format!("titles.{}", kind))),
            }
        }
        Ok(())
    }

    pub fn title(&self, kind: NotificationKind) -> &str {
        self.titles
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_title(kind))
    }
}
