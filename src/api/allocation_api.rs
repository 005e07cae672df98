// ==========================================
// Campus Administration Platform - Allocation API
// ==========================================
// Caller-facing wrapper over the allocation engine: input validation,
// error translation, and outcome reporting to the notification sink.
// Authorization has already happened upstream; callers of this API
// are allowed to allocate.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::notification::{BulkCounts, Notification, NotificationSink};
use crate::domain::cohort::Cohort;
use crate::domain::student::Student;
use crate::engine::allocation_engine::{
    AllocationEngine, AllocationError, BulkOutcome,
};
use std::sync::Arc;

// ==========================================
// AllocationApi
// ==========================================
pub struct AllocationApi {
    engine: Arc<AllocationEngine>,
    sink: Arc<dyn NotificationSink>,
}

impl AllocationApi {
    pub fn new(engine: Arc<AllocationEngine>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { engine, sink }
    }

    fn require_non_empty(value: &str, field: &str) -> ApiResult<()> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidInput(format!("{} must not be empty", field)));
        }
        Ok(())
    }

    /// Forward an engine error to the sink as an error notification,
    /// then convert it for the caller.
    fn report_error(&self, err: AllocationError) -> ApiError {
        self.sink.notify(Notification::error(err.to_string()));
        err.into()
    }

    // ==========================================
    // Single assignment
    // ==========================================

    pub async fn allocate(&self, student_id: &str, target_section: &str) -> ApiResult<Student> {
        Self::require_non_empty(student_id, "student id")?;
        Self::require_non_empty(target_section, "target section")?;

        match self.engine.allocate(student_id, target_section).await {
            Ok(student) => {
                self.sink.notify(Notification::success(format!(
                    "Assigned {} to section {}",
                    student.name, target_section
                )));
                Ok(student)
            }
            Err(err) => Err(self.report_error(err)),
        }
    }

    // ==========================================
    // Bulk assignment
    // ==========================================

    pub async fn bulk_allocate(
        &self,
        department_id: &str,
        academic_year: &str,
    ) -> ApiResult<BulkOutcome> {
        Self::require_non_empty(department_id, "department id")?;
        Self::require_non_empty(academic_year, "academic year")?;

        match self.engine.bulk_allocate(department_id, academic_year).await {
            Ok(BulkOutcome::NoEligibleStudents) => {
                self.sink.notify(Notification::warning(format!(
                    "No unassigned students found for {} {}",
                    department_id, academic_year
                )));
                Ok(BulkOutcome::NoEligibleStudents)
            }
            Ok(BulkOutcome::Completed(report)) => {
                let counts = BulkCounts {
                    eligible: report.eligible_count,
                    assigned: report.assigned_count,
                    remaining: report.remaining_count,
                };
                let notification = if report.is_partial() {
                    Notification::warning(format!(
                        "Assigned {} of {} students in {} {}; {} left unassigned (sections full)",
                        report.assigned_count,
                        report.eligible_count,
                        report.department_id,
                        report.academic_year,
                        report.remaining_count
                    ))
                } else {
                    Notification::success(format!(
                        "Assigned all {} students in {} {}",
                        report.assigned_count, report.department_id, report.academic_year
                    ))
                };
                self.sink.notify(notification.with_counts(counts));
                Ok(BulkOutcome::Completed(report))
            }
            Err(err) => Err(self.report_error(err)),
        }
    }

    // ==========================================
    // Reassignment
    // ==========================================

    /// Sections the student may be moved to (spare capacity, current
    /// section excluded). The UI offers exactly this list.
    pub async fn list_reassignment_targets(&self, student_id: &str) -> ApiResult<Vec<Cohort>> {
        Self::require_non_empty(student_id, "student id")?;
        self.engine
            .list_reassignment_targets(student_id)
            .await
            .map_err(ApiError::from)
    }

    pub async fn reassign(&self, student_id: &str, new_section: &str) -> ApiResult<Student> {
        Self::require_non_empty(student_id, "student id")?;
        Self::require_non_empty(new_section, "new section")?;

        match self.engine.reassign(student_id, new_section).await {
            Ok(student) => {
                self.sink.notify(Notification::success(format!(
                    "Moved {} to section {}",
                    student.name, new_section
                )));
                Ok(student)
            }
            Err(err @ AllocationError::NoCapacityAvailable { .. }) => {
                self.sink.notify(Notification::warning(
                    "No sections available for reassignment".to_string(),
                ));
                Err(err.into())
            }
            Err(err) => Err(self.report_error(err)),
        }
    }

    // ==========================================
    // Unassignment
    // ==========================================

    pub async fn unassign(&self, student_id: &str) -> ApiResult<Student> {
        Self::require_non_empty(student_id, "student id")?;

        match self.engine.unassign(student_id).await {
            Ok(student) => {
                self.sink.notify(Notification::success(format!(
                    "{} is now unassigned",
                    student.name
                )));
                Ok(student)
            }
            Err(err) => Err(self.report_error(err)),
        }
    }

    // ==========================================
    // Cohort listing
    // ==========================================

    /// All cohorts with live occupancy, zero-occupancy ones included.
    pub async fn list_cohorts(&self) -> ApiResult<Vec<Cohort>> {
        self.engine.list_cohorts().await.map_err(ApiError::from)
    }
}
