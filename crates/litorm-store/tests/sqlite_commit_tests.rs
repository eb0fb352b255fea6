// Integration tests for the mapping engine against SQLite
// Covers: table creation, insert-then-load round trip, dirty-only updates,
// rollback on failure, and both identity read-back strategies.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, NaiveDateTime};
use litorm_core::model::{FieldDescriptor, FieldKind, Record, RecordMeta, Row, Value};
use litorm_core::{
    derive_schema, is_dirty, repo, schema_for, table_exists, CommitOptions, IdentityReadBack,
    OrmError, StoreConnection,
};
use litorm_store::SqliteStore;
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct Score {
    meta: RecordMeta,
    name: String,
    score: f64,
}

impl Score {
    fn new(name: &str, score: f64) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
            score,
        }
    }
}

impl Record for Score {
    const TABLE: &'static str = "Score";

    fn fields() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::identity("ID"),
            FieldDescriptor::new("Name", FieldKind::Text),
            FieldDescriptor::new("Score", FieldKind::Real),
        ];
        FIELDS
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn value(&self, field: &str) -> Value {
        match field {
            "Name" => self.name.as_str().into(),
            "Score" => self.score.into(),
            _ => Value::Null,
        }
    }

    fn from_row(row: &Row) -> litorm_core::Result<Self> {
        Ok(Score {
            meta: RecordMeta::new(),
            name: row.get_text("Name")?,
            score: row.get_f64("Score")?,
        })
    }
}

#[derive(Debug, Clone)]
struct Visit {
    meta: RecordMeta,
    guest: String,
    at: NaiveDateTime,
    party: i64,
}

impl Record for Visit {
    const TABLE: &'static str = "Visit";

    fn fields() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::identity("ID"),
            FieldDescriptor::new("Guest", FieldKind::Text),
            FieldDescriptor::new("At", FieldKind::DateTime),
            FieldDescriptor::new("Party", FieldKind::Integer),
        ];
        FIELDS
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn value(&self, field: &str) -> Value {
        match field {
            "Guest" => self.guest.as_str().into(),
            "At" => self.at.into(),
            "Party" => self.party.into(),
            _ => Value::Null,
        }
    }

    fn from_row(row: &Row) -> litorm_core::Result<Self> {
        Ok(Visit {
            meta: RecordMeta::new(),
            guest: row.get_text("Guest")?,
            at: row.get_datetime("At")?,
            party: row.get_i64("Party")?,
        })
    }
}

/// SQLite store that also remembers every statement it executed
struct CountingStore {
    inner: SqliteStore,
    executed: RefCell<Vec<String>>,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            executed: RefCell::new(Vec::new()),
        }
    }

    fn count(&self, verb: &str) -> usize {
        self.executed
            .borrow()
            .iter()
            .filter(|s| s.starts_with(verb))
            .count()
    }

    fn reset(&self) {
        self.executed.borrow_mut().clear();
    }
}

impl StoreConnection for CountingStore {
    fn execute(&self, sql: &str) -> litorm_core::Result<usize> {
        self.executed.borrow_mut().push(sql.to_string());
        self.inner.execute(sql)
    }

    fn query(&self, sql: &str) -> litorm_core::Result<Vec<Row>> {
        self.inner.query(sql)
    }

    fn begin(&self) -> litorm_core::Result<()> {
        self.inner.begin()
    }

    fn commit(&self) -> litorm_core::Result<()> {
        self.inner.commit()
    }

    fn rollback(&self) -> litorm_core::Result<()> {
        self.inner.rollback()
    }

    fn table_exists(&self, table: &str) -> litorm_core::Result<bool> {
        self.inner.table_exists(table)
    }

    fn last_insert_id(&self) -> litorm_core::Result<Option<i64>> {
        self.inner.last_insert_id()
    }
}

fn row_count(store: &SqliteStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_ada_scenario_end_to_end() {
    let store = CountingStore::new();

    // Derive schema: 3 columns, ID is the identity
    let schema = derive_schema::<Score>().unwrap();
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.identity().name, "ID");

    // Create table: exists afterwards
    assert!(!table_exists(&store, &schema).unwrap());
    assert!(repo::ensure_table::<Score, _>(&store).unwrap());
    assert!(table_exists(&store, &schema).unwrap());

    // Insert {ID:0, Name:"Ada", Score:9.5}
    let mut batch = vec![Score::new("Ada", 9.5)];
    repo::commit(&store, &mut batch).unwrap();
    assert!(batch[0].id() > 0);

    let loaded: Vec<Score> = repo::load_all(&store).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id(), batch[0].id());
    assert_eq!(loaded[0].name, "Ada");
    assert_eq!(loaded[0].score, 9.5);

    // Mutate Score to 9.6 and commit again: one update, no insert
    store.reset();
    batch[0].score = 9.6;
    let summary = repo::commit(&store, &mut batch).unwrap();

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.inserted, 0);
    assert_eq!(store.count("UPDATE"), 1);
    assert_eq!(store.count("INSERT"), 0);
    assert_eq!(row_count(&store.inner, "Score"), 1);

    let reloaded: Vec<Score> = repo::load_all(&store).unwrap();
    assert_eq!(reloaded[0].score, 9.6);
}

#[test]
fn test_unchanged_loaded_batch_issues_no_updates() {
    let store = CountingStore::new();
    repo::ensure_table::<Score, _>(&store).unwrap();
    let mut fresh: Vec<Score> = (0..5).map(|i| Score::new("p", i as f64)).collect();
    repo::commit(&store, &mut fresh).unwrap();

    let mut loaded: Vec<Score> = repo::load_all(&store).unwrap();
    store.reset();
    let summary = repo::commit(&store, &mut loaded).unwrap();

    assert_eq!(summary.unchanged, 5);
    assert_eq!(store.count("UPDATE"), 0);
    assert!(loaded.iter().all(|r| !is_dirty(&schema_for::<Score>().unwrap(), r)));
}

#[test]
fn test_datetime_round_trip_and_text_quoting() {
    let store = SqliteStore::open_in_memory().unwrap();
    repo::ensure_table::<Visit, _>(&store).unwrap();

    let at = NaiveDate::from_ymd_opt(1999, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 58)
        .unwrap();
    let mut batch = vec![Visit {
        meta: RecordMeta::new(),
        guest: "O'Neil".to_string(),
        at,
        party: 4,
    }];
    repo::commit(&store, &mut batch).unwrap();

    let loaded: Vec<Visit> = repo::load_all(&store).unwrap();
    assert_eq!(loaded[0].guest, "O'Neil");
    assert_eq!(loaded[0].at, at);
    assert_eq!(loaded[0].party, 4);
}

#[test]
fn test_failed_batch_is_rolled_back() {
    let store = SqliteStore::open_in_memory().unwrap();
    repo::ensure_table::<Score, _>(&store).unwrap();

    // Given: a loaded record whose row is then deleted behind its back
    let mut seed = vec![Score::new("Ada", 9.5)];
    repo::commit(&store, &mut seed).unwrap();
    let mut batch: Vec<Score> = repo::load_all(&store).unwrap();
    store.execute("DELETE FROM Score").unwrap();

    // When: the batch contains a new record and a dirty record without a row
    batch.insert(0, Score::new("Grace", 8.0));
    batch[1].score = 1.0;
    let err = repo::commit(&store, &mut batch).unwrap_err();

    // Then: the missing row aborts the batch and Grace's insert is undone
    assert!(matches!(err, OrmError::RowMissing { .. }));
    assert_eq!(row_count(&store, "Score"), 0);
    assert_eq!(batch[0].id(), 0);
    assert!(batch[0].meta().baseline().is_none());
}

#[test]
fn test_statement_failure_is_commit_error() {
    // The table was never created, so the insert fails
    let store = SqliteStore::open_in_memory().unwrap();
    let mut batch = vec![Score::new("Ada", 9.5)];

    let err = repo::commit(&store, &mut batch).unwrap_err();

    assert!(err.is_commit_error());
    assert!(matches!(err, OrmError::StatementFailed { ref op, .. } if op == "insert"));
}

#[test]
fn test_identity_read_back_strategies_agree_for_single_session() {
    let store = SqliteStore::open_in_memory().unwrap();
    repo::ensure_table::<Score, _>(&store).unwrap();

    let mut native = vec![Score::new("a", 1.0), Score::new("b", 2.0)];
    repo::commit(&store, &mut native).unwrap();

    let mut legacy = vec![Score::new("c", 3.0)];
    let options = CommitOptions {
        identity_read_back: IdentityReadBack::MaxIdentity,
    };
    repo::commit_with(&store, &mut legacy, &options).unwrap();

    assert_eq!(native[0].id(), 1);
    assert_eq!(native[1].id(), 2);
    assert_eq!(legacy[0].id(), 3);
}

#[test]
fn test_invalid_utf8_text_fails_load_and_row_is_kept() {
    let store = SqliteStore::open_in_memory().unwrap();
    repo::ensure_table::<Score, _>(&store).unwrap();
    store
        .execute("INSERT INTO Score (Name, Score) VALUES (CAST(X'41FF42' AS TEXT), 1.0)")
        .unwrap();

    let err = repo::load_all::<Score, _>(&store).unwrap_err();
    assert_eq!(err.kind(), litorm_core::ExErrorKind::Persistence);

    // The stored bytes are untouched
    let bytes: Vec<u8> = store
        .connection()
        .query_row("SELECT CAST(Name AS BLOB) FROM Score", [], |row| row.get(0))
        .unwrap();
    assert_eq!(bytes, vec![0x41, 0xFF, 0x42]);
}

#[test]
fn test_text_with_nul_round_trips() {
    let store = SqliteStore::open_in_memory().unwrap();
    repo::ensure_table::<Score, _>(&store).unwrap();

    let mut batch = vec![Score::new("a\0b", 1.0)];
    repo::commit(&store, &mut batch).unwrap();

    let mut loaded: Vec<Score> = repo::load_all(&store).unwrap();
    assert_eq!(loaded[0].name, "a\0b");

    loaded[0].name = "c'\0".to_string();
    repo::commit(&store, &mut loaded).unwrap();
    let reloaded: Vec<Score> = repo::load_all(&store).unwrap();
    assert_eq!(reloaded[0].name, "c'\0");
}
