// ==========================================
// Campus Administration Platform - Allocation Engine
// ==========================================
// The single writer of the roster's `section` field. Performs the
// read-decide-write sequence for single allocation, bulk allocation,
// reassignment and unassignment.
//
// Concurrency: all mutating operations serialize per
// (department, academic year) group key. Two bulk runs on the same
// group would otherwise both compute available sections from a
// snapshot and race past capacity.
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::cohort::{Cohort, CohortKey};
use crate::domain::department::Department;
use crate::domain::student::Student;
use crate::engine::academic_year::{
    academic_year_label, batch_for_year, ordinal_label, parse_year_of_study,
};
use crate::engine::cohort_resolver::CohortResolver;
use crate::engine::section_filler::{OpenSection, SectionFiller};
use crate::repository::department_repo::DepartmentDirectory;
use crate::repository::error::RepositoryError;
use crate::repository::roster_repo::{RosterStore, StudentFilter};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, instrument, warn};

// ==========================================
// Errors and outcomes
// ==========================================

/// Allocation engine error type.
///
/// Every decision failure is detected before any roster write; none
/// of these is retried automatically.
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("student not found: {student_id}")]
    StudentNotFound { student_id: String },

    #[error("department not found: {department_id}")]
    DepartmentNotFound { department_id: String },

    #[error("invalid academic year label: '{label}'")]
    InvalidAcademicYear { label: String },

    #[error("section '{section}' is not defined for department {department_id}")]
    InvalidSectionReference {
        section: String,
        department_id: String,
    },

    #[error("section '{section}' of {department_id} {academic_year} is at capacity ({capacity})")]
    CapacityExceeded {
        department_id: String,
        academic_year: String,
        section: String,
        capacity: u32,
    },

    #[error("no section of {department_id} {academic_year} has spare capacity")]
    NoCapacityAvailable {
        department_id: String,
        academic_year: String,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

/// Counts from a completed bulk run. `remaining_count > 0` is the
/// partial-assignment qualified success: total capacity was
/// insufficient for all pending students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReport {
    pub department_id: String,
    pub academic_year: String,
    pub eligible_count: u32,
    pub assigned_count: u32,
    pub remaining_count: u32,
    /// (student_id, section) pairs, in decision order.
    pub assignments: Vec<(String, String)>,
}

impl BulkReport {
    pub fn is_partial(&self) -> bool {
        self.remaining_count > 0
    }
}

/// Discriminated bulk outcome. Finding no unassigned students is
/// informational, not an error: no work was needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BulkOutcome {
    NoEligibleStudents,
    Completed(BulkReport),
}

// ==========================================
// AllocationEngine
// ==========================================
pub struct AllocationEngine {
    roster: Arc<dyn RosterStore>,
    directory: Arc<dyn DepartmentDirectory>,
    resolver: CohortResolver,
    config: AllocationConfig,
    /// Calendar year used for academic-year derivation. Fixed at
    /// construction so a long bulk run cannot straddle a year change.
    current_year: i32,
    /// Per cohort-group write locks, created on first use.
    group_locks: Mutex<HashMap<CohortKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl AllocationEngine {
    pub fn new(
        roster: Arc<dyn RosterStore>,
        directory: Arc<dyn DepartmentDirectory>,
        config: AllocationConfig,
    ) -> Self {
        let resolver = CohortResolver::new(roster.clone());
        Self {
            roster,
            directory,
            resolver,
            config,
            current_year: Utc::now().year(),
            group_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Pin the calendar year (tests, replays of historical rosters).
    pub fn with_current_year(mut self, current_year: i32) -> Self {
        self.current_year = current_year;
        self
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    // ==========================================
    // Serialization per cohort group
    // ==========================================

    async fn lock_group(
        &self,
        key: &CohortKey,
    ) -> AllocationResult<tokio::sync::OwnedMutexGuard<()>> {
        let lock = {
            let mut map = self
                .group_locks
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            map.entry(key.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        Ok(lock.lock_owned().await)
    }

    /// Group key for a student's cohort. Non-numeric batches cannot be
    /// mapped to an academic year; the raw batch keys the lock instead
    /// so such records still serialize with each other.
    fn group_key(&self, department_id: &str, batch: &str) -> CohortKey {
        let academic_year = academic_year_label(batch, self.current_year)
            .unwrap_or_else(|| format!("Batch {}", batch));
        CohortKey {
            department_id: department_id.to_string(),
            academic_year,
        }
    }

    // ==========================================
    // Lookups
    // ==========================================

    async fn require_student(&self, student_id: &str) -> AllocationResult<Student> {
        self.roster
            .find_student(student_id)
            .await?
            .ok_or_else(|| AllocationError::StudentNotFound {
                student_id: student_id.to_string(),
            })
    }

    async fn require_department(&self, department_id: &str) -> AllocationResult<Department> {
        self.directory
            .find_department(department_id)
            .await?
            .ok_or_else(|| AllocationError::DepartmentNotFound {
                department_id: department_id.to_string(),
            })
    }

    // ==========================================
    // Single assignment
    // ==========================================

    /// Assign one student to `target_section` (total replacement of the
    /// current section, so the same primitive serves reassignment).
    ///
    /// Capacity is re-validated against the live roster count at write
    /// time; an at-capacity target is rejected with `CapacityExceeded`
    /// rather than trusting the caller to have offered only valid
    /// choices.
    #[instrument(skip(self), fields(student_id, target_section))]
    pub async fn allocate(
        &self,
        student_id: &str,
        target_section: &str,
    ) -> AllocationResult<Student> {
        let student = self.require_student(student_id).await?;
        let department = self.require_department(&student.department_id).await?;

        if !department.has_section(target_section) {
            return Err(AllocationError::InvalidSectionReference {
                section: target_section.to_string(),
                department_id: department.department_id,
            });
        }

        let key = self.group_key(&student.department_id, &student.batch);
        let _guard = self.lock_group(&key).await?;

        // live count, after taking the group lock
        let current_count = self
            .resolver
            .occupancy(&student.department_id, &student.batch, target_section)
            .await?;
        let already_there = student.section.as_deref() == Some(target_section);
        if current_count >= self.config.section_capacity && !already_there {
            return Err(AllocationError::CapacityExceeded {
                department_id: key.department_id,
                academic_year: key.academic_year,
                section: target_section.to_string(),
                capacity: self.config.section_capacity,
            });
        }

        let updated = self
            .roster
            .update_student_section(student_id, Some(target_section))
            .await?;
        info!(
            student_id,
            section = target_section,
            cohort = %key,
            "student assigned to section"
        );
        Ok(updated)
    }

    // ==========================================
    // Bulk assignment
    // ==========================================

    /// Assign every unassigned student of (department, academic year)
    /// to available sections, least-filled first.
    ///
    /// All decision reads happen before the first write. Writes are
    /// then applied per student in decision order; a repository error
    /// mid-sequence aborts the run and is surfaced, students already
    /// written stay assigned.
    #[instrument(skip(self), fields(department_id, academic_year))]
    pub async fn bulk_allocate(
        &self,
        department_id: &str,
        academic_year: &str,
    ) -> AllocationResult<BulkOutcome> {
        let department = self.require_department(department_id).await?;
        let year_of_study = parse_year_of_study(academic_year).ok_or_else(|| {
            AllocationError::InvalidAcademicYear {
                label: academic_year.to_string(),
            }
        })?;
        let batch = batch_for_year(year_of_study, self.current_year);
        let label = ordinal_label(year_of_study as i32);

        let key = CohortKey {
            department_id: department.department_id.clone(),
            academic_year: label.clone(),
        };
        let _guard = self.lock_group(&key).await?;

        // eligible students in stable roster order; never re-sorted
        let eligible = self
            .roster
            .find_students(&StudentFilter::cohort_group(department_id, &batch).unassigned())
            .await?;
        if eligible.is_empty() {
            info!(cohort = %key, "bulk allocation: no unassigned students");
            return Ok(BulkOutcome::NoEligibleStudents);
        }

        let cohorts = self
            .resolver
            .cohorts_for_group(
                &department,
                year_of_study,
                self.current_year,
                self.config.section_capacity,
            )
            .await?;
        let open_sections: Vec<OpenSection> = cohorts
            .iter()
            .filter(|c| c.has_spare_capacity())
            .map(|c| OpenSection {
                section: c.section.clone(),
                current_count: c.current_count,
            })
            .collect();
        if open_sections.is_empty() {
            warn!(cohort = %key, eligible = eligible.len(), "bulk allocation: no capacity");
            return Err(AllocationError::NoCapacityAvailable {
                department_id: department.department_id,
                academic_year: label,
            });
        }

        let eligible_ids: Vec<String> =
            eligible.iter().map(|s| s.student_id.clone()).collect();
        let outcome =
            SectionFiller::new(self.config.section_capacity).fill(&eligible_ids, open_sections);

        for (student_id, section) in &outcome.assignments {
            self.roster
                .update_student_section(student_id, Some(section))
                .await?;
        }

        let report = BulkReport {
            department_id: department.department_id,
            academic_year: label,
            eligible_count: eligible_ids.len() as u32,
            assigned_count: outcome.assignments.len() as u32,
            remaining_count: outcome.unassigned.len() as u32,
            assignments: outcome.assignments,
        };
        info!(
            cohort = %key,
            eligible = report.eligible_count,
            assigned = report.assigned_count,
            remaining = report.remaining_count,
            "bulk allocation completed"
        );
        Ok(BulkOutcome::Completed(report))
    }

    // ==========================================
    // Reassignment
    // ==========================================

    /// Sections a student can move to: spare capacity, excluding the
    /// student's current section.
    pub async fn list_reassignment_targets(
        &self,
        student_id: &str,
    ) -> AllocationResult<Vec<Cohort>> {
        let student = self.require_student(student_id).await?;
        let department = self.require_department(&student.department_id).await?;
        self.reassignment_targets(&student, &department).await
    }

    async fn reassignment_targets(
        &self,
        student: &Student,
        department: &Department,
    ) -> AllocationResult<Vec<Cohort>> {
        let mut cohorts = Vec::with_capacity(department.sections.len());
        for section in &department.sections {
            if student.section.as_deref() == Some(section.as_str()) {
                continue;
            }
            let current_count = self
                .resolver
                .occupancy(&student.department_id, &student.batch, section)
                .await?;
            let key = self.group_key(&student.department_id, &student.batch);
            let cohort = Cohort {
                department_id: student.department_id.clone(),
                academic_year: key.academic_year,
                section: section.clone(),
                current_count,
                capacity: self.config.section_capacity,
            };
            if cohort.has_spare_capacity() {
                cohorts.push(cohort);
            }
        }
        Ok(cohorts)
    }

    /// Move a student to `new_section`. Valid targets are the sections
    /// with spare capacity other than the current one; with no such
    /// section the roster is left untouched.
    #[instrument(skip(self), fields(student_id, new_section))]
    pub async fn reassign(&self, student_id: &str, new_section: &str) -> AllocationResult<Student> {
        let student = self.require_student(student_id).await?;
        let department = self.require_department(&student.department_id).await?;

        let key = self.group_key(&student.department_id, &student.batch);
        let _guard = self.lock_group(&key).await?;

        let targets = self.reassignment_targets(&student, &department).await?;
        if targets.is_empty() {
            return Err(AllocationError::NoCapacityAvailable {
                department_id: key.department_id,
                academic_year: key.academic_year,
            });
        }
        if student.section.as_deref() == Some(new_section)
            || !department.has_section(new_section)
        {
            return Err(AllocationError::InvalidSectionReference {
                section: new_section.to_string(),
                department_id: department.department_id,
            });
        }
        if !targets.iter().any(|c| c.section == new_section) {
            // a real section, not the current one, but full
            return Err(AllocationError::CapacityExceeded {
                department_id: key.department_id,
                academic_year: key.academic_year,
                section: new_section.to_string(),
                capacity: self.config.section_capacity,
            });
        }

        let updated = self
            .roster
            .update_student_section(student_id, Some(new_section))
            .await?;
        info!(
            student_id,
            from = student.section.as_deref().unwrap_or("-"),
            to = new_section,
            cohort = %key,
            "student reassigned"
        );
        Ok(updated)
    }

    // ==========================================
    // Unassignment
    // ==========================================

    /// Clear a student's section. Idempotent: unassigning an
    /// unassigned student is a no-op success and issues no write.
    #[instrument(skip(self), fields(student_id))]
    pub async fn unassign(&self, student_id: &str) -> AllocationResult<Student> {
        let student = self.require_student(student_id).await?;
        if student.section.is_none() {
            return Ok(student);
        }

        let key = self.group_key(&student.department_id, &student.batch);
        let _guard = self.lock_group(&key).await?;

        let updated = self.roster.update_student_section(student_id, None).await?;
        info!(student_id, cohort = %key, "student unassigned");
        Ok(updated)
    }

    // ==========================================
    // Cohort listing
    // ==========================================

    /// Full cohort enumeration across all departments (live counts,
    /// zero-occupancy cohorts included).
    pub async fn list_cohorts(&self) -> AllocationResult<Vec<Cohort>> {
        let departments = self.directory.list_departments().await?;
        let cohorts = self
            .resolver
            .list_cohorts(&departments, self.current_year, &self.config)
            .await?;
        Ok(cohorts)
    }
}
