// ==========================================
// Campus Administration Platform - Department Entity
// ==========================================
// Read-only reference data for the allocation engine. The section
// list is fixed per department and assumed stable for the duration
// of a single allocation operation.
// ==========================================

use serde::{Deserialize, Serialize};

/// Department reference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub name: String,
    /// Valid section labels for this department, e.g. ["A", "B", "C"].
    /// Order matters: it is the tie-break order during bulk allocation.
    pub sections: Vec<String>,
}

impl Department {
    /// Whether `section` is one of this department's section labels.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }
}
