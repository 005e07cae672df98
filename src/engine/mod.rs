// ==========================================
// Campus Administration Platform - Engine Layer
// ==========================================
// Allocation rules. Decision logic is pure where possible
// (academic-year arithmetic, section fill); the orchestrator owns
// the store handles and the per-cohort-group serialization.
// ==========================================

pub mod academic_year;
pub mod allocation_engine;
pub mod cohort_resolver;
pub mod section_filler;

pub use academic_year::{
    academic_year_label, batch_for_year, ordinal_label, parse_year_of_study,
};
pub use allocation_engine::{
    AllocationEngine, AllocationError, AllocationResult, BulkOutcome, BulkReport,
};
pub use cohort_resolver::CohortResolver;
pub use section_filler::{FillOutcome, OpenSection, SectionFiller};
