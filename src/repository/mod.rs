// ==========================================
// Campus Administration Platform - Repository Layer
// ==========================================
// Data access only: repositories contain no allocation logic.
// The engine depends on the `RosterStore` / `DepartmentDirectory`
// traits, never on a concrete backend.
// ==========================================

pub mod department_repo;
pub mod error;
pub mod roster_repo;

pub use department_repo::{DepartmentDirectory, SqliteDepartmentRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use roster_repo::{RosterStore, SectionFilter, SqliteRosterRepository, StudentFilter};
