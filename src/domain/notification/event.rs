//! Notification event payloads.
//!
//! One tagged enum covers every notification variant. The serialized form is
//! the wire payload: an object with a `type` discriminant followed by the
//! variant's fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    AbsenceId, EmployeeId, EvaluationId, LeaveId, ReturnWorkId, ValidationError,
};

/// Placeholder name used when the related employee record is missing.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

/// Discriminant of a [`NotificationEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LeaveRequest,
    AbsenceRequest,
    ReturnWorkRequest,
    Evaluation,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::LeaveRequest,
        NotificationKind::AbsenceRequest,
        NotificationKind::ReturnWorkRequest,
        NotificationKind::Evaluation,
    ];

    /// Value of the `type` field on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LeaveRequest => "leave_request",
            NotificationKind::AbsenceRequest => "absence_request",
            NotificationKind::ReturnWorkRequest => "return_work_request",
            NotificationKind::Evaluation => "evaluation",
        }
    }

    /// Name of the broadcast event carrying this kind.
    pub fn event_name(&self) -> &'static str {
        match self {
            NotificationKind::LeaveRequest => "LeaveRequested",
            NotificationKind::AbsenceRequest => "AbsenceRequested",
            NotificationKind::ReturnWorkRequest => "ReturnWorkRequested",
            NotificationKind::Evaluation => "EvaluationSubmitted",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_name() == name)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("type", format!("unknown notification type '{}'", s)))
    }
}

/// Payload for `LeaveRequested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequested {
    pub leave_id: LeaveId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub leave_type: String,
    pub leave_start_date: NaiveDate,
    pub leave_end_date: NaiveDate,
}

/// Payload for `AbsenceRequested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRequested {
    pub absence_id: AbsenceId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub absence_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Payload for `ReturnWorkRequested`.
///
/// `employee_id_number` and `department` come from the employee record and
/// are `null` when it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnWorkRequested {
    pub return_work_id: ReturnWorkId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub employee_id_number: Option<String>,
    pub department: Option<String>,
    pub return_date: NaiveDate,
    pub absence_type: String,
    pub reason: String,
    pub return_date_reported: NaiveDate,
}

/// Payload for `EvaluationSubmitted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSubmitted {
    pub evaluation_id: EvaluationId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
}

/// A notification-worthy HR event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    LeaveRequest(LeaveRequested),
    AbsenceRequest(AbsenceRequested),
    ReturnWorkRequest(ReturnWorkRequested),
    Evaluation(EvaluationSubmitted),
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::LeaveRequest(_) => NotificationKind::LeaveRequest,
            NotificationEvent::AbsenceRequest(_) => NotificationKind::AbsenceRequest,
            NotificationEvent::ReturnWorkRequest(_) => NotificationKind::ReturnWorkRequest,
            NotificationEvent::Evaluation(_) => NotificationKind::Evaluation,
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.kind().event_name()
    }

    pub fn employee_id(&self) -> EmployeeId {
        match self {
            NotificationEvent::LeaveRequest(e) => e.employee_id,
            NotificationEvent::AbsenceRequest(e) => e.employee_id,
            NotificationEvent::ReturnWorkRequest(e) => e.employee_id,
            NotificationEvent::Evaluation(e) => e.employee_id,
        }
    }

    pub fn employee_name(&self) -> &str {
        match self {
            NotificationEvent::LeaveRequest(e) => &e.employee_name,
            NotificationEvent::AbsenceRequest(e) => &e.employee_name,
            NotificationEvent::ReturnWorkRequest(e) => &e.employee_name,
            NotificationEvent::Evaluation(e) => &e.employee_name,
        }
    }

    /// One-line description shown under the title in the dropdown.
    pub fn summary(&self) -> String {
        match self {
            NotificationEvent::LeaveRequest(e) => format!(
                "{} requested {} leave from {} to {}",
                e.employee_name, e.leave_type, e.leave_start_date, e.leave_end_date
            ),
            NotificationEvent::AbsenceRequest(e) => format!(
                "{} requested {} absence from {} to {}",
                e.employee_name, e.absence_type, e.from_date, e.to_date
            ),
            NotificationEvent::ReturnWorkRequest(e) => format!(
                "{} returns to work on {}",
                e.employee_name, e.return_date
            ),
            NotificationEvent::Evaluation(e) => {
                format!("Evaluation submitted for {}", e.employee_name)
            }
        }
    }
}

impl From<LeaveRequested> for NotificationEvent {
    fn from(event: LeaveRequested) -> Self {
        NotificationEvent::LeaveRequest(event)
    }
}

impl From<AbsenceRequested> for NotificationEvent {
    fn from(event: AbsenceRequested) -> Self {
        NotificationEvent::AbsenceRequest(event)
    }
}

impl From<ReturnWorkRequested> for NotificationEvent {
    fn from(event: ReturnWorkRequested) -> Self {
        NotificationEvent::ReturnWorkRequest(event)
    }
}

impl From<EvaluationSubmitted> for NotificationEvent {
    fn from(event: EvaluationSubmitted) -> Self {
        NotificationEvent::Evaluation(event)
    }
}
