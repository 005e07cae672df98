// ==========================================
// Campus Administration Platform - Domain Layer
// ==========================================
// Entities and value types. No persistence, no business rules.
// ==========================================

pub mod cohort;
pub mod department;
pub mod student;
pub mod types;

pub use cohort::{Cohort, CohortKey};
pub use department::Department;
pub use student::Student;
pub use types::Role;
