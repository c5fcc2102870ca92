use nlsql::db::LoadedDatabase;
use nlsql::prompt::serialize_prompt;

const STUDENTS_SCHOOLS: &str = "
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
    INSERT INTO Students VALUES (1, 'Ada', 1), (2, 'Grace', 1);
";

fn fixture(setup_sql: &str, filename: &str) -> LoadedDatabase {
    let staging =
        std::env::temp_dir().join(format!("nlsql-itest-{}.sqlite", uuid::Uuid::new_v4()));
    {
        let conn = rusqlite::Connection::open(&staging).unwrap();
        conn.execute_batch(setup_sql).unwrap();
    }
    let bytes = std::fs::read(&staging).unwrap();
    std::fs::remove_file(&staging).unwrap();
    LoadedDatabase::load(filename, &bytes).unwrap()
}

#[test]
fn test_schema_from_uploaded_bytes() {
    let db = fixture(STUDENTS_SCHOOLS, "mydb.sqlite");
    assert_eq!(db.database_id(), "mydb");

    let tables = db.schema().unwrap();
    assert_eq!(tables.len(), 2);

    let students = tables
        .iter()
        .find(|t| t.table_name == "Students")
        .unwrap();
    assert_eq!(students.columns.len(), 3);

    let id = &students.columns[0];
    assert_eq!(id.name, "id");
    assert!(id.is_primary_key);
    assert!(id.foreign_key.is_none());

    let school_id = &students.columns[2];
    assert!(!school_id.is_primary_key);
    let fk = school_id.foreign_key.as_ref().unwrap();
    assert_eq!(fk.parent_table, "Schools");
    assert_eq!(fk.parent_column, "id");
}

#[test]
fn test_prompt_for_loaded_database() {
    let db = fixture(STUDENTS_SCHOOLS, "mydb.sqlite");
    let tables = db.schema().unwrap();

    let prompt = serialize_prompt(db.database_id(), &tables, "list all student names");
    assert_eq!(
        prompt,
        "<db_id>mydb\
         <table>Schools<col><primary_key>id<sep>name\
         <table>Students<col><primary_key>id<sep>name<sep>school_id\
         <parent_table>Schools<referred_key>id\
         <question>list all student names"
    );
}

#[test]
fn test_schema_survives_reload() {
    let db = fixture(STUDENTS_SCHOOLS, "first.sqlite");
    drop(db);

    let db = fixture("CREATE TABLE only_one (x INTEGER);", "second.sqlite");
    let tables = db.schema().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].table_name, "only_one");
}
