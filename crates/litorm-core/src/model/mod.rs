//! Mapping model: field descriptors, column schemas, values and records

pub mod field;
pub mod record;
pub mod value;

pub use field::{ColumnSchema, FieldDescriptor, FieldKind};
pub use record::{Record, RecordMeta};
pub use value::{Row, Value, DATETIME_FORMAT};
