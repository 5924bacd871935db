use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EmployeeId};
use crate::domain::workforce::Employee;
use crate::ports::EmployeeDirectory;

/// Employee directory backed by a map.
#[derive(Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let employees = employees.into_iter().map(|e| (e.id, e)).collect();
        Self {
            employees: RwLock::new(employees),
        }
    }

    pub async fn insert(&self, employee: Employee) {
        self.employees.write().await.insert(employee.id, employee);
    }

    pub async fn remove(&self, id: EmployeeId) -> Option<Employee> {
        self.employees.write().await.remove(&id)
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn find(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_known_employee_and_misses_unknown() {
        let employee = Employee::new(EmployeeId::new(7), "Ana", "Reyes").unwrap();
        let directory = InMemoryEmployeeDirectory::with_employees([employee.clone()]);

        assert_eq!(directory.find(EmployeeId::new(7)).await.unwrap(), Some(employee));
        assert_eq!(directory.find(EmployeeId::new(8)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn removed_employee_is_no_longer_found() {
        let directory = InMemoryEmployeeDirectory::new();
        directory
            .insert(Employee::new(EmployeeId::new(7), "Ana", "Reyes").unwrap())
            .await;

        assert!(directory.remove(EmployeeId::new(7)).await.is_some());
        assert_eq!(directory.find(EmployeeId::new(7)).await.unwrap(), None);
    }
}
