#![allow(dead_code)]

use chrono::NaiveDateTime;
use litorm_core::model::{FieldDescriptor, FieldKind, Record, RecordMeta, Row, Value};
use litorm_core::{OrmError, Result, StoreConnection};
use std::cell::{Cell, RefCell};

/// In-memory stand-in for a store: records every statement it is asked to
/// run and answers queries from scripted rows.
pub struct RecordingConnection {
    statements: RefCell<Vec<String>>,
    rows: RefCell<Vec<Row>>,
    tables: RefCell<Vec<String>>,
    next_id: Cell<i64>,
    last_insert: Cell<Option<i64>>,
    report_identity: Cell<bool>,
    affected: Cell<usize>,
    fail_on: RefCell<Option<String>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self {
            statements: RefCell::new(Vec::new()),
            rows: RefCell::new(Vec::new()),
            tables: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            last_insert: Cell::new(None),
            report_identity: Cell::new(true),
            affected: Cell::new(1),
            fail_on: RefCell::new(None),
        }
    }

    /// Rows returned by every query
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        *self.rows.borrow_mut() = rows;
        self
    }

    /// Fail any statement containing `fragment`
    pub fn failing_on(self, fragment: &str) -> Self {
        *self.fail_on.borrow_mut() = Some(fragment.to_string());
        self
    }

    /// Pretend the store never reports an inserted identity
    pub fn without_identity(self) -> Self {
        self.report_identity.set(false);
        self
    }

    /// Rows reported as affected by UPDATE statements
    pub fn affecting(self, rows: usize) -> Self {
        self.affected.set(rows);
        self
    }

    pub fn with_table(self, table: &str) -> Self {
        self.tables.borrow_mut().push(table.to_string());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn clear(&self) {
        self.statements.borrow_mut().clear();
    }

    /// Statements starting with the given verb
    pub fn count(&self, verb: &str) -> usize {
        self.statements
            .borrow()
            .iter()
            .filter(|s| s.starts_with(verb))
            .count()
    }

    fn record(&self, sql: &str) -> Result<()> {
        self.statements.borrow_mut().push(sql.to_string());
        match self.fail_on.borrow().as_deref() {
            Some(fragment) if sql.contains(fragment) => Err(OrmError::Persistence {
                message: format!("forced failure on '{}'", fragment),
            }),
            _ => Ok(()),
        }
    }
}

impl StoreConnection for RecordingConnection {
    fn execute(&self, sql: &str) -> Result<usize> {
        self.record(sql)?;
        if sql.starts_with("INSERT") {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.last_insert
                .set(self.report_identity.get().then_some(id));
            return Ok(1);
        }
        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let name = rest.split_whitespace().next().unwrap_or_default();
            self.tables.borrow_mut().push(name.to_string());
            return Ok(0);
        }
        if sql.starts_with("UPDATE") {
            return Ok(self.affected.get());
        }
        Ok(0)
    }

    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        self.record(sql)?;
        Ok(self.rows.borrow().clone())
    }

    fn begin(&self) -> Result<()> {
        self.record("BEGIN")
    }

    fn commit(&self) -> Result<()> {
        self.record("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.record("ROLLBACK")
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.borrow().iter().any(|t| t == table))
    }

    fn last_insert_id(&self) -> Result<Option<i64>> {
        Ok(self.last_insert.get())
    }
}

/// `{ID, Name, Score}` record used across the scenarios
#[derive(Debug, Clone, Default)]
pub struct Score {
    pub meta: RecordMeta,
    pub name: String,
    pub score: f64,
}

impl Score {
    pub fn new(name: &str, score: f64) -> Self {
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

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Score {
            meta: RecordMeta::new(),
            name: row.get_text("Name")?,
            score: row.get_f64("Score")?,
        })
    }
}

/// Record with a date, an unmapped flag and a transient note
#[derive(Debug, Clone)]
pub struct Member {
    pub meta: RecordMeta,
    pub name: String,
    pub joined: NaiveDateTime,
    pub visits: i64,
    pub active: bool,
    pub note: String,
}

impl Member {
    pub fn new(name: &str, joined: NaiveDateTime) -> Self {
        Self {
            meta: RecordMeta::new(),
            name: name.to_string(),
            joined,
            visits: 0,
            active: true,
            note: String::new(),
        }
    }
}

impl Record for Member {
    const TABLE: &'static str = "Member";

    fn fields() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::identity("ID"),
            FieldDescriptor::new("Name", FieldKind::Text),
            FieldDescriptor::new("Joined", FieldKind::DateTime),
            FieldDescriptor::new("Visits", FieldKind::Integer),
            FieldDescriptor::new("Active", FieldKind::Unmapped("bool")),
            FieldDescriptor::new("Note", FieldKind::Text).transient(),
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
            "Joined" => self.joined.into(),
            "Visits" => self.visits.into(),
            "Active" => Value::Integer(self.active as i64),
            "Note" => self.note.as_str().into(),
            _ => Value::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Member {
            meta: RecordMeta::new(),
            name: row.get_text("Name")?,
            joined: row.get_datetime("Joined")?,
            visits: row.get_i64("Visits")?,
            active: true,
            note: String::new(),
        })
    }
}

pub fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}
