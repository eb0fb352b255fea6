//! The introspection contract between record types and the mapping engine

use crate::errors::{OrmError, Result};
use crate::model::field::FieldDescriptor;
use crate::model::value::{Row, Value};
use crate::snapshot::Snapshot;

/// Mapping bookkeeping every record carries: its identity and the baseline
/// snapshot taken when it was last loaded or written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMeta {
    id: i64,
    baseline: Option<Snapshot>,
}

impl RecordMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store-assigned identity, `0` while the record is unsaved
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Assign the identity.
    ///
    /// Succeeds only while the identity is still unset; any later assignment,
    /// even to the same value, fails with `IdentityImmutable`.
    pub fn set_id(&mut self, id: i64) -> Result<()> {
        if self.id != 0 {
            return Err(OrmError::IdentityImmutable {
                current: self.id,
                attempted: id,
            });
        }
        self.id = id;
        Ok(())
    }

    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    pub(crate) fn replace_baseline(&mut self, snapshot: Snapshot) {
        self.baseline = Some(snapshot);
    }
}

/// A record type that can be mapped onto a table.
///
/// Implementors declare a static field table instead of relying on runtime
/// inspection. The identity field is served from `meta()`, so `value` only
/// has to answer for the other fields.
///
/// ```
/// use litorm_core::model::{FieldDescriptor, FieldKind, Record, RecordMeta, Row, Value};
///
/// #[derive(Default)]
/// struct Tag {
///     meta: RecordMeta,
///     label: String,
/// }
///
/// impl Record for Tag {
///     const TABLE: &'static str = "Tag";
///
///     fn fields() -> &'static [FieldDescriptor] {
///         const FIELDS: &[FieldDescriptor] = &[
///             FieldDescriptor::identity("ID"),
///             FieldDescriptor::new("Label", FieldKind::Text),
///         ];
///         FIELDS
///     }
///
///     fn meta(&self) -> &RecordMeta { &self.meta }
///     fn meta_mut(&mut self) -> &mut RecordMeta { &mut self.meta }
///
///     fn value(&self, field: &str) -> Value {
///         match field {
///             "Label" => self.label.as_str().into(),
///             _ => Value::Null,
///         }
///     }
///
///     fn from_row(row: &Row) -> litorm_core::Result<Self> {
///         Ok(Tag { label: row.get_text("Label")?, ..Default::default() })
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Table the type is stored in
    const TABLE: &'static str;

    /// Declared fields, in column order
    fn fields() -> &'static [FieldDescriptor];

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Current value of a non-identity field
    fn value(&self, field: &str) -> Value;

    /// Build a record from a conformed row.
    ///
    /// Identity and baseline are filled in by the loader afterwards.
    fn from_row(row: &Row) -> Result<Self>;

    fn id(&self) -> i64 {
        self.meta().id()
    }

    fn set_id(&mut self, id: i64) -> Result<()> {
        self.meta_mut().set_id(id)
    }

    fn is_new(&self) -> bool {
        self.id() == 0
    }

    /// Value of any persisted field, the identity included
    fn field_value(&self, field: &FieldDescriptor) -> Value {
        if field.is_identity {
            Value::Integer(self.id())
        } else {
            self.value(field.name)
        }
    }
}
