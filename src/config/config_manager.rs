// ==========================================
// Campus Administration Platform - Configuration Manager
// ==========================================
// Storage: config_kv table (key-value, scope_id='global').
// The engine never reads configuration itself; it is handed an
// AllocationConfig value at construction time.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// Configuration keys
// ==========================================
const KEY_SECTION_CAPACITY: &str = "allocation.section_capacity";
const KEY_ACADEMIC_YEAR_SPAN: &str = "allocation.academic_year_span";

/// Default per-section capacity (students per section).
pub const DEFAULT_SECTION_CAPACITY: u32 = 65;

/// Default number of academic years in a program.
pub const DEFAULT_ACADEMIC_YEAR_SPAN: u32 = 4;

// ==========================================
// AllocationConfig
// ==========================================

/// Engine parameters. Capacity is always a parameter, never a literal
/// inside the allocation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Maximum students per (department, academic year, section) cohort.
    pub section_capacity: u32,
    /// Academic years enumerated by the cohort resolver (1..=span).
    pub academic_year_span: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            section_capacity: DEFAULT_SECTION_CAPACITY,
            academic_year_span: DEFAULT_ACADEMIC_YEAR_SPAN,
        }
    }
}

// ==========================================
// ConfigManager
// ==========================================

/// Reads configuration overrides from the config_kv table.
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Read a raw value from config_kv (scope_id='global').
    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        use rusqlite::OptionalExtension;
        let conn = self.get_conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a value into config_kv (scope_id='global').
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn get_u32_or(&self, key: &str, default: u32) -> RepositoryResult<u32> {
        match self.get_value(key)? {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                RepositoryError::FieldValueError {
                    field: key.to_string(),
                    message: format!("expected unsigned integer, got '{}': {}", raw, e),
                }
            }),
            None => Ok(default),
        }
    }

    /// Assemble the engine configuration from stored overrides and
    /// built-in defaults.
    pub fn load_allocation_config(&self) -> RepositoryResult<AllocationConfig> {
        let section_capacity = self.get_u32_or(KEY_SECTION_CAPACITY, DEFAULT_SECTION_CAPACITY)?;
        let academic_year_span =
            self.get_u32_or(KEY_ACADEMIC_YEAR_SPAN, DEFAULT_ACADEMIC_YEAR_SPAN)?;

        if section_capacity == 0 {
            return Err(RepositoryError::FieldValueError {
                field: KEY_SECTION_CAPACITY.to_string(),
                message: "section capacity must be at least 1".to_string(),
            });
        }

        Ok(AllocationConfig {
            section_capacity,
            academic_year_span,
        })
    }
}
