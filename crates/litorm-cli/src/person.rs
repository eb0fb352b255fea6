//! The sample `Person` record

use chrono::NaiveDateTime;
use litorm_core::model::{FieldDescriptor, FieldKind, Record, RecordMeta, Row, Value};

#[derive(Debug, Clone)]
pub struct Person {
    meta: RecordMeta,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDateTime,
    pub age: i64,
    /// Declared but never stored: booleans have no column type
    pub is_alive: bool,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str, date_of_birth: NaiveDateTime, age: i64) -> Self {
        Self {
            meta: RecordMeta::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth,
            age,
            is_alive: true,
        }
    }
}

impl Record for Person {
    const TABLE: &'static str = "Person";

    fn fields() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::identity("ID"),
            FieldDescriptor::new("FirstName", FieldKind::Text),
            FieldDescriptor::new("LastName", FieldKind::Text),
            FieldDescriptor::new("DateOfBirth", FieldKind::DateTime),
            FieldDescriptor::new("Age", FieldKind::Integer),
            FieldDescriptor::new("IsAlive", FieldKind::Unmapped("bool")),
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
            "FirstName" => self.first_name.as_str().into(),
            "LastName" => self.last_name.as_str().into(),
            "DateOfBirth" => self.date_of_birth.into(),
            "Age" => self.age.into(),
            "IsAlive" => Value::Integer(self.is_alive as i64),
            _ => Value::Null,
        }
    }

    fn from_row(row: &Row) -> litorm_core::Result<Self> {
        Ok(Person {
            meta: RecordMeta::new(),
            first_name: row.get_text("FirstName")?,
            last_name: row.get_text("LastName")?,
            date_of_birth: row.get_datetime("DateOfBirth")?,
            age: row.get_i64("Age")?,
            is_alive: false,
        })
    }
}
