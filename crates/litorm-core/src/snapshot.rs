//! Change snapshots for dirty checking
//!
//! A snapshot is the canonical byte encoding of a record's stored fields.
//! Comparing a fresh snapshot with the baseline taken at load time tells the
//! commit path whether an update is needed.
//!
//! ## Encoding
//!
//! Stored fields are visited in schema order, identity included:
//!
//! - integers: 8 little-endian bytes
//! - reals: the 8 little-endian bytes of the IEEE-754 value
//! - text: each UTF-16 code unit as 2 little-endian bytes
//! - date/time: year, month, day as 4 little-endian bytes each
//! - null: a single zero byte
//!
//! Time-of-day is not part of the encoding, so moving a timestamp within the
//! same day does not make a record dirty. Unmapped fields are skipped.

use crate::model::{ColumnSchema, Record, Value};
use chrono::Datelike;

/// Opaque content encoding, compared byte for byte
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({})", self.to_hex())
    }
}

/// Compute the snapshot of a record's current field values
pub fn compute_snapshot<R: Record>(schema: &ColumnSchema, record: &R) -> Snapshot {
    encode(schema, record, record.id())
}

/// Snapshot as it will look once `identity` has been assigned.
///
/// Used by the commit path before the new identity is written back.
pub(crate) fn compute_snapshot_with_identity<R: Record>(
    schema: &ColumnSchema,
    record: &R,
    identity: i64,
) -> Snapshot {
    encode(schema, record, identity)
}

/// Whether a record differs from its baseline.
///
/// A record without a baseline was never loaded or written and is always dirty.
pub fn is_dirty<R: Record>(schema: &ColumnSchema, record: &R) -> bool {
    match record.meta().baseline() {
        None => true,
        Some(baseline) => compute_snapshot(schema, record) != *baseline,
    }
}

fn encode<R: Record>(schema: &ColumnSchema, record: &R, identity: i64) -> Snapshot {
    let mut bytes = Vec::new();
    for field in schema.columns() {
        let value = if field.is_identity {
            Value::Integer(identity)
        } else {
            record.value(field.name)
        };
        encode_value(&mut bytes, &value);
    }
    Snapshot(bytes)
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.push(0),
        Value::Integer(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Real(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Text(s) => {
            for unit in s.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        Value::DateTime(dt) => {
            out.extend_from_slice(&dt.year().to_le_bytes());
            out.extend_from_slice(&(dt.month() as i32).to_le_bytes());
            out.extend_from_slice(&(dt.day() as i32).to_le_bytes());
        }
    }
}
