// ==========================================
// Campus Administration Platform - Cohort View
// ==========================================
// A cohort is a derived (department, academic year, section) bucket.
// It is a view over the roster, never a stored counter: occupancy is
// recomputed from the roster store on every engine decision.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived occupancy view for one (department, academic year, section)
/// bucket. `current_count` is the live roster count at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub department_id: String,
    /// Ordinal year-of-study label, e.g. "1st Year".
    pub academic_year: String,
    pub section: String,
    pub current_count: u32,
    pub capacity: u32,
}

impl Cohort {
    /// Whether another student can be assigned to this cohort.
    pub fn has_spare_capacity(&self) -> bool {
        self.current_count < self.capacity
    }

    /// Whether the cohort is at (or, after an external over-write, above)
    /// capacity.
    pub fn is_full(&self) -> bool {
        self.current_count >= self.capacity
    }

    /// Seats left before the cohort is full.
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.current_count)
    }

    /// Serialization key for the cohort group this bucket belongs to.
    pub fn key(&self) -> CohortKey {
        CohortKey {
            department_id: self.department_id.clone(),
            academic_year: self.academic_year.clone(),
        }
    }
}

// ==========================================
// CohortKey - (department, academic year) group key
// ==========================================
// All mutating engine operations serialize per this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    pub department_id: String,
    pub academic_year: String,
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.department_id, self.academic_year)
    }
}
