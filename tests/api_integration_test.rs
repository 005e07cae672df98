// ==========================================
// Allocation API integration tests
// ==========================================
// Verifies the caller-facing layer: input validation, error
// translation, and the notifications emitted per outcome.
// ==========================================


use section_allocator::api::{AllocationApi, ApiError, OutcomeLevel};
use section_allocator::config::AllocationConfig;
use section_allocator::domain::Department;
use section_allocator::engine::{AllocationEngine, BulkOutcome};
use std::sync::Arc;
use test_helpers::{make_department, make_student, MemoryDirectory, MemoryRoster, RecordingSink};

const FIRST_YEAR_BATCH: &str = "2024";

fn make_api(
    roster: Arc<MemoryRoster>,
    departments: Vec<Department>,
    capacity: u32,
) -> (AllocationApi, Arc<RecordingSink>) {
    let engine = Arc::new(
        AllocationEngine::new(
            roster,
            MemoryDirectory::new(departments),
            AllocationConfig {
                section_capacity: capacity,
                academic_year_span: 4,
            },
        )
        .with_current_year(2025),
    );
    let sink = RecordingSink::new();
    let api = AllocationApi::new(engine, sink.clone());
    (api, sink)
}

// ==========================================
// Input validation
// ==========================================

#[tokio::test]
async fn test_blank_inputs_are_rejected_before_the_engine() {
    let roster = MemoryRoster::with_students(vec![]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A"])], 65);

    assert!(matches!(
        api.allocate("", "A").await.unwrap_err(),
        ApiError::InvalidInput(_)
    ));
    assert!(matches!(
        api.allocate("S1", "  ").await.unwrap_err(),
        ApiError::InvalidInput(_)
    ));
    assert!(matches!(
        api.bulk_allocate("CSE", "").await.unwrap_err(),
        ApiError::InvalidInput(_)
    ));
    assert!(matches!(
        api.unassign("").await.unwrap_err(),
        ApiError::InvalidInput(_)
    ));

    // validation failures never reach the sink
    assert!(sink.take().is_empty());
}

// ==========================================
// Notifications per outcome
// ==========================================

#[tokio::test]
async fn test_full_bulk_success_notifies_with_counts() {
    let roster = MemoryRoster::with_students(vec![
        make_student("S1", "CSE", FIRST_YEAR_BATCH, None),
        make_student("S2", "CSE", FIRST_YEAR_BATCH, None),
    ]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A", "B"])], 65);

    let outcome = api.bulk_allocate("CSE", "1st Year").await.unwrap();
    assert!(matches!(outcome, BulkOutcome::Completed(_)));

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Success);
    let counts = notifications[0].counts.expect("bulk counts attached");
    assert_eq!(counts.eligible, 2);
    assert_eq!(counts.assigned, 2);
    assert_eq!(counts.remaining, 0);
}

#[tokio::test]
async fn test_partial_bulk_is_a_warning_with_counts() {
    let roster = MemoryRoster::with_students(vec![
        make_student("S1", "CSE", FIRST_YEAR_BATCH, None),
        make_student("S2", "CSE", FIRST_YEAR_BATCH, None),
        make_student("S3", "CSE", FIRST_YEAR_BATCH, None),
    ]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A"])], 2);

    let outcome = api.bulk_allocate("CSE", "1st Year").await.unwrap();
    match outcome {
        BulkOutcome::Completed(report) => assert!(report.is_partial()),
        other => panic!("expected Completed, got {:?}", other),
    }

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Warning);
    assert!(notifications[0].message.contains("left unassigned"));
    let counts = notifications[0].counts.expect("bulk counts attached");
    assert_eq!(counts.assigned, 2);
    assert_eq!(counts.remaining, 1);
}

#[tokio::test]
async fn test_no_eligible_students_is_a_warning() {
    let roster = MemoryRoster::with_students(vec![]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A"])], 65);

    let outcome = api.bulk_allocate("CSE", "1st Year").await.unwrap();
    assert!(matches!(outcome, BulkOutcome::NoEligibleStudents));

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Warning);
    assert!(notifications[0].message.contains("No unassigned students"));
}

#[tokio::test]
async fn test_engine_error_is_notified_and_translated() {
    let roster = MemoryRoster::with_students(vec![
        make_student("A1", "CSE", FIRST_YEAR_BATCH, Some("A")),
        make_student("S1", "CSE", FIRST_YEAR_BATCH, None),
    ]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A", "B"])], 1);

    let err = api.allocate("S1", "A").await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::CapacityConstraintViolation { .. }
    ));

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Error);
}

#[tokio::test]
async fn test_reassign_without_targets_is_a_warning() {
    // single-section department: nowhere to move to
    let roster = MemoryRoster::with_students(vec![make_student(
        "S1",
        "CSE",
        FIRST_YEAR_BATCH,
        Some("A"),
    )]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A"])], 65);

    let err = api.reassign("S1", "A").await.unwrap_err();
    assert!(matches!(err, ApiError::NoCapacityAvailable(_)));

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Warning);
    assert_eq!(
        notifications[0].message,
        "No sections available for reassignment"
    );
}

#[tokio::test]
async fn test_unassign_notifies_success() {
    let roster = MemoryRoster::with_students(vec![make_student(
        "S1",
        "CSE",
        FIRST_YEAR_BATCH,
        Some("A"),
    )]);
    let (api, sink) = make_api(roster, vec![make_department("CSE", &["A"])], 65);

    let student = api.unassign("S1").await.unwrap();
    assert_eq!(student.section, None);

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, OutcomeLevel::Success);
}

#[tokio::test]
async fn test_not_found_errors_map_to_api_not_found() {
    let roster = MemoryRoster::with_students(vec![]);
    let (api, _sink) = make_api(roster, vec![make_department("CSE", &["A"])], 65);

    assert!(matches!(
        api.unassign("GHOST").await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        api.bulk_allocate("MECH", "1st Year").await.unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_list_reassignment_targets_pass_through() {
    let roster = MemoryRoster::with_students(vec![make_student(
        "S1",
        "CSE",
        FIRST_YEAR_BATCH,
        Some("A"),
    )]);
    let (api, _sink) = make_api(roster, vec![make_department("CSE", &["A", "B", "C"])], 65);

    let targets = api.list_reassignment_targets("S1").await.unwrap();
    let sections: Vec<&str> = targets.iter().map(|c| c.section.as_str()).collect();
    assert_eq!(sections, vec!["B", "C"]);
}
