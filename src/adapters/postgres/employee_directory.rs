//! PostgreSQL implementation of EmployeeDirectory.
//!
//! Reads the HR application's `employees` table; this crate never writes it.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, EmployeeId, ErrorCode};
use crate::domain::workforce::Employee;
use crate::ports::EmployeeDirectory;

#[derive(Clone)]
pub struct PostgresEmployeeDirectory {
    pool: PgPool,
}

impl PostgresEmployeeDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for PostgresEmployeeDirectory {
    async fn find(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, employee_id_number, department
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch employee: {}", e),
            )
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to decode employee row: {}", e),
            )
        };

        Ok(Some(Employee {
            id: EmployeeId::new(row.try_get("id").map_err(decode)?),
            first_name: row.try_get("first_name").map_err(decode)?,
            last_name: row.try_get("last_name").map_err(decode)?,
            employee_id_number: row.try_get("employee_id_number").map_err(decode)?,
            department: row.try_get("department").map_err(decode)?,
        }))
    }
}
