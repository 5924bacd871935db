//! Workforce records that trigger notifications.
//!
//! These are read-only projections of rows owned by the HR application.
//! Only the fields that end up in a notification payload are modelled.

mod employee;
mod requests;

pub use employee::Employee;
pub use requests::{AbsenceRequest, Evaluation, LeaveRequest, ReturnWorkRequest};
