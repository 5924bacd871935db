use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AbsenceId, EmployeeId, EvaluationId, LeaveId, ReturnWorkId, ValidationError,
};

fn ensure_ordered(field: &str, from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if to < from {
        return Err(ValidationError::invalid_format(
            field,
            format!("end date {} is before start date {}", to, from),
        ));
    }
    Ok(())
}

fn ensure_present(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

/// A leave request filed by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub employee_id: EmployeeId,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LeaveRequest {
    pub fn new(
        id: LeaveId,
        employee_id: EmployeeId,
        leave_type: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let leave_type = leave_type.into();
        ensure_present("leave_type", &leave_type)?;
        ensure_ordered("leave_end_date", start_date, end_date)?;
        Ok(Self {
            id,
            employee_id,
            leave_type,
            start_date,
            end_date,
        })
    }
}

/// An absence request filed by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRequest {
    pub id: AbsenceId,
    pub employee_id: EmployeeId,
    pub absence_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl AbsenceRequest {
    pub fn new(
        id: AbsenceId,
        employee_id: EmployeeId,
        absence_type: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let absence_type = absence_type.into();
        ensure_present("absence_type", &absence_type)?;
        ensure_ordered("to_date", from_date, to_date)?;
        Ok(Self {
            id,
            employee_id,
            absence_type,
            from_date,
            to_date,
        })
    }
}

/// Notice that an employee is returning after an absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnWorkRequest {
    pub id: ReturnWorkId,
    pub employee_id: EmployeeId,
    pub return_date: NaiveDate,
    pub absence_type: String,
    pub reason: String,
    /// Date the return was reported to HR.
    pub return_date_reported: NaiveDate,
}

impl ReturnWorkRequest {
    pub fn new(
        id: ReturnWorkId,
        employee_id: EmployeeId,
        return_date: NaiveDate,
        absence_type: impl Into<String>,
        reason: impl Into<String>,
        return_date_reported: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let absence_type = absence_type.into();
        ensure_present("absence_type", &absence_type)?;
        Ok(Self {
            id,
            employee_id,
            return_date,
            absence_type,
            reason: reason.into(),
            return_date_reported,
        })
    }
}

/// A submitted performance evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub employee_id: EmployeeId,
}

impl Evaluation {
    pub fn new(id: EvaluationId, employee_id: EmployeeId) -> Self {
        Self { id, employee_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn leave_request_accepts_single_day_range() {
        let leave = LeaveRequest::new(
            LeaveId::new(1),
            EmployeeId::new(2),
            "Sick",
            date("2025-03-01"),
            date("2025-03-01"),
        );
        assert!(leave.is_ok());
    }

    #[test]
    fn leave_request_rejects_inverted_range() {
        let err = LeaveRequest::new(
            LeaveId::new(1),
            EmployeeId::new(2),
            "Vacation",
            date("2025-03-05"),
            date("2025-03-01"),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "leave_end_date"));
    }

    #[test]
    fn absence_request_requires_type() {
        let err = AbsenceRequest::new(
            AbsenceId::new(1),
            EmployeeId::new(2),
            "  ",
            date("2025-03-01"),
            date("2025-03-02"),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::empty_field("absence_type"));
    }

    #[test]
    fn return_work_request_allows_blank_reason() {
        let request = ReturnWorkRequest::new(
            ReturnWorkId::new(4),
            EmployeeId::new(2),
            date("2025-04-01"),
            "Medical",
            "",
            date("2025-03-28"),
        )
        .unwrap();
        assert_eq!(request.reason, "");
    }
}
