// ==========================================
// Campus Administration Platform - Student Entity
// ==========================================
// Owned by the roster store. The allocation engine only reads
// students and patches the `section` field; it never creates or
// destroys records.
// ==========================================

use crate::domain::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Student record as seen by the allocation engine.
///
/// `section == None` means unassigned. `batch` is the enrollment year
/// (e.g. "2024") from which the academic year is derived; it is never
/// interpreted by the roster store itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub department_id: String,
    pub batch: String,
    pub section: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Whether the student currently belongs to a section.
    pub fn is_assigned(&self) -> bool {
        self.section.is_some()
    }
}
