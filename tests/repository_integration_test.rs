// ==========================================
// SQLite repository integration tests
// ==========================================
// Exercises the production stores against a real temp-file database:
// filter translation, stable roster order, section updates, and the
// JSON section-list round trip.
// ==========================================


use section_allocator::repository::{
    DepartmentDirectory, RepositoryError, RosterStore, SqliteDepartmentRepository,
    SqliteRosterRepository, StudentFilter,
};
use test_helpers::{create_test_db, make_department, make_student, open_test_connection};

// students carry a foreign key to departments, so the roster fixtures
// need the reference rows in place first
fn setup_roster() -> (tempfile::NamedTempFile, SqliteRosterRepository) {
    let (temp_file, db_path) = create_test_db().expect("create test db");
    let conn = open_test_connection(&db_path).expect("open test connection");
    let directory =
        SqliteDepartmentRepository::from_connection(conn.clone()).expect("department repo");
    directory
        .upsert_department(&make_department("CSE", &["A", "B", "C"]))
        .unwrap();
    directory
        .upsert_department(&make_department("ECE", &["A", "B"]))
        .unwrap();
    let repo = SqliteRosterRepository::from_connection(conn).expect("build repository");
    (temp_file, repo)
}

// ==========================================
// Roster store
// ==========================================

#[tokio::test]
async fn test_insert_and_find_student_round_trip() {
    let (_db, repo) = setup_roster();
    let student = make_student("S1", "CSE", "2024", Some("A"));
    repo.insert_student(&student).unwrap();

    let found = repo.find_student("S1").await.unwrap().unwrap();
    assert_eq!(found.student_id, "S1");
    assert_eq!(found.department_id, "CSE");
    assert_eq!(found.batch, "2024");
    assert_eq!(found.section.as_deref(), Some("A"));

    assert!(repo.find_student("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_students_applies_conjunctive_filters() {
    let (_db, repo) = setup_roster();
    repo.insert_student(&make_student("S1", "CSE", "2024", Some("A")))
        .unwrap();
    repo.insert_student(&make_student("S2", "CSE", "2024", None))
        .unwrap();
    repo.insert_student(&make_student("S3", "CSE", "2023", None))
        .unwrap();
    repo.insert_student(&make_student("S4", "ECE", "2024", None))
        .unwrap();

    let unassigned = repo
        .find_students(&StudentFilter::cohort_group("CSE", "2024").unassigned())
        .await
        .unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].student_id, "S2");

    let in_a = repo
        .find_students(&StudentFilter::cohort_group("CSE", "2024").with_section("A"))
        .await
        .unwrap();
    assert_eq!(in_a.len(), 1);
    assert_eq!(in_a[0].student_id, "S1");

    let everyone = repo.find_students(&StudentFilter::default()).await.unwrap();
    assert_eq!(everyone.len(), 4);
}

#[tokio::test]
async fn test_find_students_preserves_insertion_order() {
    let (_db, repo) = setup_roster();
    // ids deliberately out of lexical order
    for id in ["S9", "S1", "S5", "S3"] {
        repo.insert_student(&make_student(id, "CSE", "2024", None))
            .unwrap();
    }

    let students = repo
        .find_students(&StudentFilter::cohort_group("CSE", "2024"))
        .await
        .unwrap();
    let ids: Vec<&str> = students.iter().map(|s| s.student_id.as_str()).collect();
    assert_eq!(ids, vec!["S9", "S1", "S5", "S3"]);
}

#[tokio::test]
async fn test_count_students_matches_find() {
    let (_db, repo) = setup_roster();
    for i in 0..5 {
        let section = if i < 3 { Some("A") } else { None };
        repo.insert_student(&make_student(&format!("S{}", i), "CSE", "2024", section))
            .unwrap();
    }

    let filter = StudentFilter::cohort_group("CSE", "2024").with_section("A");
    let count = repo.count_students(&filter).await.unwrap();
    let found = repo.find_students(&filter).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(found.len() as u32, count);
}

#[tokio::test]
async fn test_update_student_section_set_and_clear() {
    let (_db, repo) = setup_roster();
    repo.insert_student(&make_student("S1", "CSE", "2024", None))
        .unwrap();

    let assigned = repo.update_student_section("S1", Some("B")).await.unwrap();
    assert_eq!(assigned.section.as_deref(), Some("B"));

    let cleared = repo.update_student_section("S1", None).await.unwrap();
    assert_eq!(cleared.section, None);

    let reread = repo.find_student("S1").await.unwrap().unwrap();
    assert_eq!(reread.section, None);
}

#[tokio::test]
async fn test_update_unknown_student_is_not_found() {
    let (_db, repo) = setup_roster();

    let err = repo
        .update_student_section("GHOST", Some("A"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_duplicate_student_id_is_rejected() {
    let (_db, repo) = setup_roster();
    repo.insert_student(&make_student("S1", "CSE", "2024", None))
        .unwrap();

    let err = repo
        .insert_student(&make_student("S1", "CSE", "2024", None))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
}

#[tokio::test]
async fn test_student_with_unknown_department_is_rejected() {
    let (_db, repo) = setup_roster();

    let err = repo
        .insert_student(&make_student("S1", "MECH", "2024", None))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}

// ==========================================
// Department directory
// ==========================================

#[tokio::test]
async fn test_department_sections_round_trip_through_json() {
    let (_db, db_path) = create_test_db().expect("create test db");
    let conn = open_test_connection(&db_path).expect("open test connection");
    let repo = SqliteDepartmentRepository::from_connection(conn).expect("build repository");

    repo.upsert_department(&make_department("CSE", &["A", "B", "C"]))
        .unwrap();
    repo.upsert_department(&make_department("ECE", &["A", "B"]))
        .unwrap();

    let cse = repo.find_department("CSE").await.unwrap().unwrap();
    assert_eq!(cse.sections, vec!["A", "B", "C"]);

    let all = repo.list_departments().await.unwrap();
    assert_eq!(all.len(), 2);
    // listing is ordered by department id
    assert_eq!(all[0].department_id, "CSE");
    assert_eq!(all[1].department_id, "ECE");

    assert!(repo.find_department("MECH").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_replaces_section_list() {
    let (_db, db_path) = create_test_db().expect("create test db");
    let conn = open_test_connection(&db_path).expect("open test connection");
    let repo = SqliteDepartmentRepository::from_connection(conn).expect("build repository");

    repo.upsert_department(&make_department("CSE", &["A", "B"]))
        .unwrap();
    repo.upsert_department(&make_department("CSE", &["A", "B", "C"]))
        .unwrap();

    let cse = repo.find_department("CSE").await.unwrap().unwrap();
    assert_eq!(cse.sections, vec!["A", "B", "C"]);
    assert_eq!(repo.list_departments().await.unwrap().len(), 1);
}

// ==========================================
// Cross-store wiring
// ==========================================

#[tokio::test]
async fn test_engine_runs_against_sqlite_stores() {
    use section_allocator::config::AllocationConfig;
    use section_allocator::engine::{AllocationEngine, BulkOutcome};
    use std::sync::Arc;

    let (_db, db_path) = create_test_db().expect("create test db");
    let conn = open_test_connection(&db_path).expect("open test connection");
    let roster =
        Arc::new(SqliteRosterRepository::from_connection(conn.clone()).expect("roster repo"));
    let directory =
        Arc::new(SqliteDepartmentRepository::from_connection(conn).expect("department repo"));

    directory
        .upsert_department(&make_department("CSE", &["A", "B"]))
        .unwrap();
    for i in 0..3 {
        roster
            .insert_student(&make_student(&format!("S{}", i), "CSE", "2024", None))
            .unwrap();
    }

    let engine = AllocationEngine::new(
        roster.clone(),
        directory,
        AllocationConfig {
            section_capacity: 2,
            academic_year_span: 4,
        },
    )
    .with_current_year(2025);

    let outcome = engine.bulk_allocate("CSE", "1st Year").await.unwrap();
    let report = match outcome {
        BulkOutcome::Completed(report) => report,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert_eq!(report.assigned_count, 3);

    let assigned = roster
        .find_students(&StudentFilter::cohort_group("CSE", "2024").with_section("A"))
        .await
        .unwrap();
    assert_eq!(assigned.len(), 2);
}
