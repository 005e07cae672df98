// ==========================================
// Campus Administration Platform - Section Allocation Core
// ==========================================
// Scope: section capacity allocation only. Department/subject CRUD,
// authentication and UI live in the surrounding platform and reach
// this crate through the repository traits.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - roster and reference data access
pub mod repository;

// Engine layer - allocation rules
pub mod engine;

// Configuration layer
pub mod config;

// Database infrastructure (connection init / PRAGMA / schema)
pub mod db;

// Logging
pub mod logging;

// API layer - caller-facing surface
pub mod api;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::types::Role;

// Domain entities
pub use domain::{Cohort, CohortKey, Department, Student};

// Engine
pub use engine::{
    academic_year_label, batch_for_year, parse_year_of_study, AllocationEngine, AllocationError,
    AllocationResult, BulkOutcome, BulkReport, CohortResolver, SectionFiller,
};

// API
pub use api::{AllocationApi, ApiError, Notification, NotificationSink, OutcomeLevel};

// Configuration
pub use config::AllocationConfig;

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Campus Section Allocator";

// Database schema version
pub const DB_VERSION: &str = "v0.1";
