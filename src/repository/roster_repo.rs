// ==========================================
// Campus Administration Platform - Roster Store
// ==========================================
// The roster is the single source of truth for section occupancy.
// The allocation engine reads through this trait and patches the
// `section` field through it; nothing else in the crate writes
// student records.
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::student::Student;
use crate::domain::types::Role;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// Filters
// ==========================================

/// Section predicate for roster queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SectionFilter {
    /// No section constraint.
    #[default]
    Any,
    /// Students with no section assigned.
    Unassigned,
    /// Students assigned to exactly this section.
    Is(String),
}

/// Roster query filter. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub department_id: Option<String>,
    pub batch: Option<String>,
    pub section: SectionFilter,
    pub role: Option<Role>,
}

impl StudentFilter {
    /// Filter for one department/batch cohort group.
    pub fn cohort_group(department_id: &str, batch: &str) -> Self {
        Self {
            department_id: Some(department_id.to_string()),
            batch: Some(batch.to_string()),
            role: Some(Role::Student),
            ..Self::default()
        }
    }

    pub fn with_section(mut self, section: &str) -> Self {
        self.section = SectionFilter::Is(section.to_string());
        self
    }

    pub fn unassigned(mut self) -> Self {
        self.section = SectionFilter::Unassigned;
        self
    }
}

// ==========================================
// RosterStore trait
// ==========================================
// Implementors: SqliteRosterRepository (production), in-memory fakes
// in the test suite.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Fetch students matching `filter`, in stable roster order
    /// (insertion order). Bulk allocation depends on that order being
    /// deterministic across calls.
    async fn find_students(&self, filter: &StudentFilter) -> RepositoryResult<Vec<Student>>;

    /// Fetch a single student by id.
    async fn find_student(&self, student_id: &str) -> RepositoryResult<Option<Student>>;

    /// Count students matching `filter` without materializing them.
    async fn count_students(&self, filter: &StudentFilter) -> RepositoryResult<u32>;

    /// Set or clear a student's section (total replacement) and return
    /// the updated record.
    ///
    /// # Errors
    /// - `RepositoryError::NotFound` if the student id does not resolve.
    async fn update_student_section(
        &self,
        student_id: &str,
        section: Option<&str>,
    ) -> RepositoryResult<Student>;
}

// ==========================================
// SqliteRosterRepository
// ==========================================

/// SQLite-backed roster store over the `students` table.
pub struct SqliteRosterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRosterRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build from an already-open connection. The unified PRAGMAs are
    /// re-applied (idempotent).
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

    /// Insert a new student row. Used by seeding and the surrounding
    /// platform's enrollment flow, not by the allocation engine.
    pub fn insert_student(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO students
                (student_id, name, department_id, batch, section, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                student.student_id,
                student.name,
                student.department_id,
                student.batch,
                student.section,
                student.role.to_string(),
                student.created_at,
                student.updated_at,
            ],
        )?;
        Ok(())
    }

    // ==========================================
    // Query assembly
    // ==========================================

    /// Translate a `StudentFilter` into a WHERE clause and parameter list.
    fn build_where(filter: &StudentFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut bind: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref department_id) = filter.department_id {
            bind.push(Box::new(department_id.clone()));
            clauses.push(format!("department_id = ?{}", bind.len()));
        }
        if let Some(ref batch) = filter.batch {
            bind.push(Box::new(batch.clone()));
            clauses.push(format!("batch = ?{}", bind.len()));
        }
        match filter.section {
            SectionFilter::Any => {}
            SectionFilter::Unassigned => clauses.push("section IS NULL".to_string()),
            SectionFilter::Is(ref section) => {
                bind.push(Box::new(section.clone()));
                clauses.push(format!("section = ?{}", bind.len()));
            }
        }
        if let Some(role) = filter.role {
            bind.push(Box::new(role.to_string()));
            clauses.push(format!("role = ?{}", bind.len()));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        (where_sql, bind)
    }

    fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
        let role: String = row.get("role")?;
        Ok(Student {
            student_id: row.get("student_id")?,
            name: row.get("name")?,
            department_id: row.get("department_id")?,
            batch: row.get("batch")?,
            section: row.get("section")?,
            role: Role::from_db_str(&role),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[async_trait]
impl RosterStore for SqliteRosterRepository {
    async fn find_students(&self, filter: &StudentFilter) -> RepositoryResult<Vec<Student>> {
        let (where_sql, bind) = Self::build_where(filter);
        let conn = self.get_conn()?;
        // rowid preserves insertion order, which is the roster order the
        // bulk allocator walks.
        let sql = format!(
            "SELECT student_id, name, department_id, batch, section, role, created_at, updated_at \
             FROM students{} ORDER BY rowid",
            where_sql
        );
        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(params.as_slice(), Self::row_to_student)?;
        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }
        Ok(students)
    }

    async fn find_student(&self, student_id: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_id, name, department_id, batch, section, role, created_at, updated_at \
             FROM students WHERE student_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![student_id], Self::row_to_student)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn count_students(&self, filter: &StudentFilter) -> RepositoryResult<u32> {
        let (where_sql, bind) = Self::build_where(filter);
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM students{}", where_sql);
        let params: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|b| b.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params.as_slice(), |row| row.get(0))?;
        Ok(count as u32)
    }

    async fn update_student_section(
        &self,
        student_id: &str,
        section: Option<&str>,
    ) -> RepositoryResult<Student> {
        {
            let conn = self.get_conn()?;
            let updated = conn.execute(
                "UPDATE students SET section = ?1, updated_at = ?2 WHERE student_id = ?3",
                params![section, Utc::now(), student_id],
            )?;
            if updated == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "Student".to_string(),
                    id: student_id.to_string(),
                });
            }
        }
        match self.find_student(student_id).await? {
            Some(student) => Ok(student),
            None => Err(RepositoryError::NotFound {
                entity: "Student".to_string(),
                id: student_id.to_string(),
            }),
        }
    }
}
