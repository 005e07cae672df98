// ==========================================
// Campus Administration Platform - Cohort Resolver
// ==========================================
// Derives (department, academic year, section) cohorts and their
// occupancy by querying the roster store LIVE on every call.
// Occupancy is a view, never a cached counter: this is what keeps
// displayed counts and actual assignments from drifting apart under
// concurrent external edits.
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::cohort::Cohort;
use crate::domain::department::Department;
use crate::engine::academic_year::{batch_for_year, ordinal_label};
use crate::repository::error::RepositoryResult;
use crate::repository::roster_repo::{RosterStore, StudentFilter};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// CohortResolver
// ==========================================
pub struct CohortResolver {
    roster: Arc<dyn RosterStore>,
}

impl CohortResolver {
    pub fn new(roster: Arc<dyn RosterStore>) -> Self {
        Self { roster }
    }

    /// Live occupancy of one (department, batch, section) bucket.
    pub async fn occupancy(
        &self,
        department_id: &str,
        batch: &str,
        section: &str,
    ) -> RepositoryResult<u32> {
        self.roster
            .count_students(&StudentFilter::cohort_group(department_id, batch).with_section(section))
            .await
    }

    /// Cohorts of one (department, year of study) group, one per
    /// section, in the department's section order. Zero-occupancy
    /// cohorts are included: they are valid allocation targets.
    pub async fn cohorts_for_group(
        &self,
        department: &Department,
        year_of_study: u32,
        current_year: i32,
        capacity: u32,
    ) -> RepositoryResult<Vec<Cohort>> {
        let batch = batch_for_year(year_of_study, current_year);
        let academic_year = ordinal_label(year_of_study as i32);

        let mut cohorts = Vec::with_capacity(department.sections.len());
        for section in &department.sections {
            let current_count = self
                .occupancy(&department.department_id, &batch, section)
                .await?;
            cohorts.push(Cohort {
                department_id: department.department_id.clone(),
                academic_year: academic_year.clone(),
                section: section.clone(),
                current_count,
                capacity,
            });
        }
        Ok(cohorts)
    }

    /// Enumerate the full cross product
    /// {departments} x {years 1..=span} x {sections} with live counts.
    /// An empty department list yields an empty result.
    #[instrument(skip(self, departments, config), fields(
        departments = departments.len(),
        current_year,
        span = config.academic_year_span
    ))]
    pub async fn list_cohorts(
        &self,
        departments: &[Department],
        current_year: i32,
        config: &AllocationConfig,
    ) -> RepositoryResult<Vec<Cohort>> {
        let mut cohorts = Vec::new();
        for department in departments {
            for year_of_study in 1..=config.academic_year_span {
                let group = self
                    .cohorts_for_group(
                        department,
                        year_of_study,
                        current_year,
                        config.section_capacity,
                    )
                    .await?;
                cohorts.extend(group);
            }
        }
        Ok(cohorts)
    }
}
