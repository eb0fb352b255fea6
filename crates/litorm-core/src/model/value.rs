//! Field values and column-keyed rows

use crate::errors::{OrmError, Result};
use crate::model::field::{ColumnSchema, FieldKind};
use chrono::{NaiveDate, NaiveDateTime};

/// Text form used for `DATETIME` columns
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single field value as read from or written to the store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert a raw store value into the representation `kind` expects.
    ///
    /// SQLite hands back `DATETIME` columns as text and may return whole
    /// reals as integers; both are normalized here.
    pub fn conform(self, kind: FieldKind) -> std::result::Result<Value, String> {
        match (kind, self) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldKind::Unmapped(_), v) => Ok(v),
            (FieldKind::Integer, v @ Value::Integer(_)) => Ok(v),
            (FieldKind::Real, v @ Value::Real(_)) => Ok(v),
            (FieldKind::Real, Value::Integer(v)) => Ok(Value::Real(v as f64)),
            (FieldKind::Text, v @ Value::Text(_)) => Ok(v),
            (FieldKind::DateTime, v @ Value::DateTime(_)) => Ok(v),
            (FieldKind::DateTime, Value::Text(s)) => parse_datetime(&s).map(Value::DateTime),
            (kind, v) => Err(format!("expected {:?}, found {:?}", kind, v)),
        }
    }
}

fn parse_datetime(s: &str) -> std::result::Result<NaiveDateTime, String> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
    {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid datetime '{}'", s))
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One result row, keyed by column name
///
/// Rows coming straight from a connection are untyped; `conform` checks them
/// against a schema before `Record::from_row` decodes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    table: String,
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.values.push((column.into(), value));
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Normalize every stored column of `schema` and tag the row with its table.
    ///
    /// Columns the schema does not know are dropped.
    pub fn conform(self, schema: &ColumnSchema) -> Result<Row> {
        let mut conformed = Row {
            table: schema.table().to_string(),
            values: Vec::with_capacity(self.values.len()),
        };
        for (column, value) in self.values {
            let Some(field) = schema.field(&column) else {
                continue;
            };
            let value = value.conform(field.kind).map_err(|reason| OrmError::Decode {
                table: schema.table().to_string(),
                column: column.clone(),
                reason,
            })?;
            conformed.values.push((column, value));
        }
        Ok(conformed)
    }

    fn require(&self, column: &str) -> Result<&Value> {
        self.get(column).ok_or_else(|| self.decode_error(column, "column missing"))
    }

    fn decode_error(&self, column: &str, reason: &str) -> OrmError {
        OrmError::Decode {
            table: self.table.clone(),
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64> {
        self.require(column)?
            .as_i64()
            .ok_or_else(|| self.decode_error(column, "not an integer"))
    }

    pub fn get_f64(&self, column: &str) -> Result<f64> {
        self.require(column)?
            .as_f64()
            .ok_or_else(|| self.decode_error(column, "not a real"))
    }

    pub fn get_text(&self, column: &str) -> Result<String> {
        self.require(column)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.decode_error(column, "not text"))
    }

    pub fn get_datetime(&self, column: &str) -> Result<NaiveDateTime> {
        self.require(column)?
            .as_datetime()
            .ok_or_else(|| self.decode_error(column, "not a datetime"))
    }

    /// Nullable text column; a missing column also reads as `None`
    pub fn get_opt_text(&self, column: &str) -> Result<Option<String>> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_text(column).map(Some),
        }
    }
}
