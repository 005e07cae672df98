// ==========================================
// Campus Administration Platform - Demo Roster Seeder
// ==========================================
// Maintenance binary: creates a fresh database, seeds departments and
// an unassigned roster, then runs a bulk allocation end to end.
//
// Usage:
//   seed_demo_roster [db_path]
// ==========================================

use chrono::{Datelike, Utc};
use section_allocator::api::{AllocationApi, TracingNotificationSink};
use section_allocator::config::ConfigManager;
use section_allocator::db;
use section_allocator::domain::{Department, Role, Student};
use section_allocator::engine::{AllocationEngine, BulkOutcome};
use section_allocator::logging;
use section_allocator::repository::{SqliteDepartmentRepository, SqliteRosterRepository};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(db::get_default_db_path);
    tracing::info!("seeding demo roster into {}", db_path);

    {
        let conn = db::open_sqlite_connection(&db_path)?;
        db::init_schema(&conn)?;
    }

    let roster = Arc::new(SqliteRosterRepository::new(&db_path)?);
    let directory = Arc::new(SqliteDepartmentRepository::new(&db_path)?);

    // departments with their fixed section lists
    let departments = vec![
        Department {
            department_id: "CSE".to_string(),
            name: "Computer Science and Engineering".to_string(),
            sections: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        },
        Department {
            department_id: "ECE".to_string(),
            name: "Electronics and Communication Engineering".to_string(),
            sections: vec!["A".to_string(), "B".to_string()],
        },
    ];
    for department in &departments {
        directory.upsert_department(department)?;
    }

    // 150 unassigned first-year CSE students: A and B fill to the
    // 65-seat capacity, C takes the remaining 20
    let current_year = Utc::now().year();
    // a (current_year - 1) batch is in its 1st year
    let batch = (current_year - 1).to_string();
    let now = Utc::now();
    for i in 0..150 {
        let student = Student {
            student_id: Uuid::new_v4().to_string(),
            name: format!("Demo Student {:03}", i + 1),
            department_id: "CSE".to_string(),
            batch: batch.clone(),
            section: None,
            role: Role::Student,
            created_at: now,
            updated_at: now,
        };
        roster.insert_student(&student)?;
    }
    tracing::info!("seeded {} departments and 150 students", departments.len());

    let config = ConfigManager::new(&db_path)?.load_allocation_config()?;
    let engine = Arc::new(AllocationEngine::new(roster, directory, config));
    let api = AllocationApi::new(engine, Arc::new(TracingNotificationSink));

    match api.bulk_allocate("CSE", "1st Year").await? {
        BulkOutcome::NoEligibleStudents => {
            tracing::info!("nothing to allocate");
        }
        BulkOutcome::Completed(report) => {
            tracing::info!(
                assigned = report.assigned_count,
                eligible = report.eligible_count,
                remaining = report.remaining_count,
                "bulk allocation report"
            );
        }
    }

    for cohort in api.list_cohorts().await? {
        tracing::info!(
            department = %cohort.department_id,
            year = %cohort.academic_year,
            section = %cohort.section,
            count = cohort.current_count,
            capacity = cohort.capacity,
            "cohort occupancy"
        );
    }

    Ok(())
}
