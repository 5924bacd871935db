use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmployeeId, ValidationError};

/// Employee record as seen by notification producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Badge / payroll number printed on HR documents.
    pub employee_id_number: Option<String>,
    pub department: Option<String>,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() && last_name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id,
            first_name,
            last_name,
            employee_id_number: None,
            department: None,
        })
    }

    pub fn with_id_number(mut self, number: impl Into<String>) -> Self {
        self.employee_id_number = Some(number.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// First and last name joined by a single space, ignoring blank parts.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
