use nlsql::config::Settings;
use nlsql::session::{QuerySlot, SessionError, Workbench};

const COLLEGE: &str = "
    CREATE TABLE Schools (
        id INTEGER PRIMARY KEY,
        name TEXT
    );
    CREATE TABLE Students (
        id INTEGER PRIMARY KEY,
        name TEXT,
        school_id INTEGER,
        FOREIGN KEY (school_id) REFERENCES Schools(id)
    );
    INSERT INTO Schools VALUES (1, 'Central High');
    INSERT INTO Students VALUES (1, 'Ada', 1), (2, 'Grace', NULL);
";

fn fixture_bytes(setup_sql: &str) -> Vec<u8> {
    let staging =
        std::env::temp_dir().join(format!("nlsql-wb-{}.sqlite", uuid::Uuid::new_v4()));
    {
        let conn = rusqlite::Connection::open(&staging).unwrap();
        conn.execute_batch(setup_sql).unwrap();
    }
    let bytes = std::fs::read(&staging).unwrap();
    std::fs::remove_file(&staging).unwrap();
    bytes
}

fn loaded_workbench() -> Workbench {
    let mut wb = Workbench::new(&Settings::default());
    wb.load_database("college.sqlite", &fixture_bytes(COLLEGE))
        .unwrap();
    wb
}

#[test]
fn test_load_reports_summary_and_resets_session() {
    let mut wb = Workbench::new(&Settings::default());
    let summary = wb
        .load_database("college.sqlite", &fixture_bytes(COLLEGE))
        .unwrap();

    assert_eq!(summary.database_id, "college");
    assert_eq!(summary.table_count, 2);
    assert_eq!(wb.session().database_id.as_deref(), Some("college"));
    assert!(wb.session().predicted_sql.is_empty());
}

#[test]
fn test_failed_load_keeps_previous_database() {
    let mut wb = loaded_workbench();

    let err = wb.load_database("junk.sqlite", b"nope").unwrap_err();
    assert!(matches!(err, SessionError::Db(_)));

    assert!(wb.has_database());
    assert_eq!(wb.session().database_id.as_deref(), Some("college"));
}

#[test]
fn test_execute_fills_slot_independently() {
    let mut wb = loaded_workbench();

    let outcome = wb
        .execute(
            QuerySlot::Predicted,
            Some("SELECT name FROM Students ORDER BY id"),
        )
        .unwrap();
    assert_eq!(outcome.columns, vec!["name"]);
    assert_eq!(outcome.rows.len(), 2);
    assert_eq!(outcome.rows[0]["name"], "Ada");
    assert!(!outcome.no_results);

    let outcome = wb
        .execute(QuerySlot::Expected, Some("SELECT name FROM Schools"))
        .unwrap();
    assert_eq!(outcome.rows.len(), 1);

    let session = wb.session();
    assert_eq!(session.predicted_rows.len(), 2);
    assert_eq!(session.expected_rows.len(), 1);
    assert_eq!(session.predicted_sql, "SELECT name FROM Students ORDER BY id");
    assert_eq!(session.expected_sql, "SELECT name FROM Schools");
}

#[test]
fn test_execute_renders_null_placeholder() {
    let mut wb = loaded_workbench();

    let outcome = wb
        .execute(
            QuerySlot::Predicted,
            Some("SELECT name, school_id FROM Students WHERE id = 2"),
        )
        .unwrap();
    assert_eq!(outcome.rows[0]["school_id"], "NULL");
}

#[test]
fn test_execute_empty_result_sets_no_results() {
    let mut wb = loaded_workbench();

    let outcome = wb
        .execute(
            QuerySlot::Predicted,
            Some("SELECT * FROM Students WHERE id = 99"),
        )
        .unwrap();
    assert!(outcome.no_results);
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.columns, vec!["id", "name", "school_id"]);
}

#[test]
fn test_execute_error_names_the_slot() {
    let mut wb = loaded_workbench();

    let err = wb
        .execute(QuerySlot::Expected, Some("SELECT * FROM missing"))
        .unwrap_err();
    match err {
        SessionError::Execution { slot, .. } => assert_eq!(slot, QuerySlot::Expected),
        other => panic!("unexpected error: {other}"),
    }
    // The stored SQL keeps the failing text so the user can edit it.
    assert_eq!(wb.session().expected_sql, "SELECT * FROM missing");
    assert!(wb.session().expected_rows.is_empty());
}

#[test]
fn test_execute_error_leaves_other_slot_intact() {
    let mut wb = loaded_workbench();

    wb.execute(QuerySlot::Predicted, Some("SELECT name FROM Students"))
        .unwrap();
    let _ = wb
        .execute(QuerySlot::Expected, Some("not sql at all"))
        .unwrap_err();

    assert_eq!(wb.session().predicted_rows.len(), 2);
}

#[tokio::test]
async fn test_score_requires_filled_pair() {
    let mut wb = loaded_workbench();

    let err = wb.score(None).await.unwrap_err();
    assert!(matches!(err, SessionError::IncompleteScorePair));

    wb.execute(QuerySlot::Predicted, Some("SELECT name FROM Students"))
        .unwrap();
    let err = wb.score(Some("   ")).await.unwrap_err();
    assert!(matches!(err, SessionError::IncompleteScorePair));
}

#[test]
fn test_unload_resets_everything() {
    let mut wb = loaded_workbench();
    wb.execute(QuerySlot::Predicted, Some("SELECT name FROM Students"))
        .unwrap();

    wb.unload();

    assert!(!wb.has_database());
    let session = wb.session();
    assert!(session.database_id.is_none());
    assert!(session.predicted_sql.is_empty());
    assert!(session.predicted_rows.is_empty());
    assert!(session.similarity_score.is_none());

    let err = wb
        .execute(QuerySlot::Predicted, Some("SELECT 1"))
        .unwrap_err();
    assert!(matches!(err, SessionError::NoDatabase));
}
