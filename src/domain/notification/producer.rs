//! Building notification events from workforce records.

use crate::domain::foundation::EmployeeId;
use crate::domain::workforce::{AbsenceRequest, Employee, Evaluation, LeaveRequest, ReturnWorkRequest};

use super::event::{
    AbsenceRequested, EvaluationSubmitted, LeaveRequested, NotificationEvent, ReturnWorkRequested,
    UNKNOWN_EMPLOYEE,
};

/// A workforce record whose creation raises exactly one notification.
pub trait NotificationSource: Send + Sync {
    /// Employee the record belongs to, used for the name lookup.
    fn employee_id(&self) -> EmployeeId;

    /// Builds the event. A missing employee yields [`UNKNOWN_EMPLOYEE`].
    fn to_event(&self, employee: Option<&Employee>) -> NotificationEvent;
}

fn employee_name(employee: Option<&Employee>) -> String {
    employee
        .map(Employee::full_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string())
}

impl NotificationSource for LeaveRequest {
    fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    fn to_event(&self, employee: Option<&Employee>) -> NotificationEvent {
        LeaveRequested {
            leave_id: self.id,
            employee_id: self.employee_id,
            employee_name: employee_name(employee),
            leave_type: self.leave_type.clone(),
            leave_start_date: self.start_date,
            leave_end_date: self.end_date,
        }
        .into()
    }
}

impl NotificationSource for AbsenceRequest {
    fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    fn to_event(&self, employee: Option<&Employee>) -> NotificationEvent {
        AbsenceRequested {
            absence_id: self.id,
            employee_id: self.employee_id,
            employee_name: employee_name(employee),
            absence_type: self.absence_type.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
        }
        .into()
    }
}

impl NotificationSource for ReturnWorkRequest {
    fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    fn to_event(&self, employee: Option<&Employee>) -> NotificationEvent {
        ReturnWorkRequested {
            return_work_id: self.id,
            employee_id: self.employee_id,
            employee_name: employee_name(employee),
            employee_id_number: employee.and_then(|e| e.employee_id_number.clone()),
            department: employee.and_then(|e| e.department.clone()),
            return_date: self.return_date,
            absence_type: self.absence_type.clone(),
            reason: self.reason.clone(),
            return_date_reported: self.return_date_reported,
        }
        .into()
    }
}

impl NotificationSource for Evaluation {
    fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    fn to_event(&self, employee: Option<&Employee>) -> NotificationEvent {
        EvaluationSubmitted {
            evaluation_id: self.id,
            employee_id: self.employee_id,
            employee_name: employee_name(employee),
        }
        .into()
    }
}
