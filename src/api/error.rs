// ==========================================
// Campus Administration Platform - API Errors
// ==========================================
// Translates engine and repository errors into user-facing messages.
// Every message carries an explicit reason.
// ==========================================

use crate::engine::allocation_engine::AllocationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error type.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("capacity constraint violated: section {section} is full ({capacity} students)")]
    CapacityConstraintViolation { section: String, capacity: u32 },

    #[error("no capacity available: {0}")]
    NoCapacityAvailable(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::StudentNotFound { student_id } => {
                ApiError::NotFound(format!("student '{}' does not exist", student_id))
            }
            AllocationError::DepartmentNotFound { department_id } => {
                ApiError::NotFound(format!("department '{}' does not exist", department_id))
            }
            AllocationError::InvalidAcademicYear { label } => ApiError::InvalidInput(format!(
                "'{}' is not an academic year label (expected e.g. '1st Year')",
                label
            )),
            AllocationError::InvalidSectionReference {
                section,
                department_id,
            } => ApiError::InvalidInput(format!(
                "section '{}' is not a valid target in department '{}'",
                section, department_id
            )),
            AllocationError::CapacityExceeded {
                section, capacity, ..
            } => ApiError::CapacityConstraintViolation { section, capacity },
            AllocationError::NoCapacityAvailable {
                department_id,
                academic_year,
            } => ApiError::NoCapacityAvailable(format!(
                "all sections of {} {} are at capacity",
                department_id, academic_year
            )),
            AllocationError::Repository(repo_err) => repo_err.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) does not exist", entity, id))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field '{}': {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result alias for the API layer.
pub type ApiResult<T> = Result<T, ApiError>;
