//! Employee lookup used by notification producers.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmployeeId};
use crate::domain::workforce::Employee;

/// Read access to employee records.
///
/// A missing employee is `Ok(None)`, not an error.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn find(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError>;
}
