// ==========================================
// Campus Administration Platform - Department Directory
// ==========================================
// Read-only reference data. Section lists are stored as a JSON array
// in the `sections` column and assumed stable for the duration of an
// allocation operation.
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::department::Department;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// DepartmentDirectory trait
// ==========================================
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    /// All departments with their section lists.
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// One department by id.
    async fn find_department(&self, department_id: &str) -> RepositoryResult<Option<Department>>;
}

// ==========================================
// SqliteDepartmentRepository
// ==========================================

/// SQLite-backed department directory over the `departments` table.
pub struct SqliteDepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDepartmentRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert or replace a department row. Used by seeding; department
    /// CRUD proper lives in the surrounding platform.
    pub fn upsert_department(&self, department: &Department) -> RepositoryResult<()> {
        let sections_json =
            serde_json::to_string(&department.sections).map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "sections".to_string(),
                    message: e.to_string(),
                }
            })?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO departments (department_id, name, sections)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(department_id) DO UPDATE SET name = ?2, sections = ?3
            "#,
            params![department.department_id, department.name, sections_json],
        )?;
        Ok(())
    }

    fn row_to_department(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
        Ok((row.get("department_id")?, row.get("name")?, row.get("sections")?))
    }

    fn parse_department(
        (department_id, name, sections_json): (String, String, String),
    ) -> RepositoryResult<Department> {
        let sections: Vec<String> =
            serde_json::from_str(&sections_json).map_err(|e| RepositoryError::FieldValueError {
                field: "sections".to_string(),
                message: format!("invalid JSON section list for {}: {}", department_id, e),
            })?;
        Ok(Department {
            department_id,
            name,
            sections,
        })
    }
}

#[async_trait]
impl DepartmentDirectory for SqliteDepartmentRepository {
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let raw_rows = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                "SELECT department_id, name, sections FROM departments ORDER BY department_id",
            )?;
            let rows = stmt.query_map([], Self::row_to_department)?;
            let mut raw = Vec::new();
            for row in rows {
                raw.push(row?);
            }
            raw
        };
        raw_rows.into_iter().map(Self::parse_department).collect()
    }

    async fn find_department(&self, department_id: &str) -> RepositoryResult<Option<Department>> {
        let raw = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                "SELECT department_id, name, sections FROM departments WHERE department_id = ?1",
            )?;
            let mut rows = stmt.query_map(params![department_id], Self::row_to_department)?;
            match rows.next() {
                Some(row) => Some(row?),
                None => None,
            }
        };
        raw.map(Self::parse_department).transpose()
    }
}
