//! Static field descriptors and the column schema derived from them

/// Semantic storage kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
    DateTime,
    /// A declared type that falls into none of the storage buckets.
    ///
    /// Such fields stay in the schema but are left out of every generated
    /// statement and of the change snapshot.
    Unmapped(&'static str),
}

impl FieldKind {
    /// Column type used in `CREATE TABLE`, `None` for unmapped kinds
    pub fn sql_type(&self) -> Option<&'static str> {
        match self {
            FieldKind::Integer => Some("INTEGER"),
            FieldKind::Real => Some("REAL"),
            FieldKind::Text => Some("TEXT"),
            FieldKind::DateTime => Some("DATETIME"),
            FieldKind::Unmapped(_) => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.sql_type().is_some()
    }

    /// Numeric literals are embedded unquoted
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Real)
    }
}

/// Declaration of a single record field
///
/// Record types expose a `'static` table of these; the constructors are
/// `const` so the table can live in a `const` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub is_identity: bool,
    pub persisted: bool,
}

impl FieldDescriptor {
    /// A persisted, non-identity field
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            is_identity: false,
            persisted: true,
        }
    }

    /// The identity (primary key) field
    pub const fn identity(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            is_identity: true,
            persisted: true,
        }
    }

    /// Opt this field out of persistence
    pub const fn transient(mut self) -> Self {
        self.persisted = false;
        self
    }

    /// Whether the field takes part in DDL, DML and snapshots
    pub fn is_stored(&self) -> bool {
        self.persisted && self.kind.is_mapped()
    }
}

/// Ordered persisted fields of one record type
///
/// Built by `introspect::derive_schema`, which guarantees exactly one
/// identity field. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    table: &'static str,
    fields: Vec<FieldDescriptor>,
    identity: usize,
}

impl ColumnSchema {
    pub(crate) fn new(table: &'static str, fields: Vec<FieldDescriptor>, identity: usize) -> Self {
        Self {
            table,
            fields,
            identity,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// All persisted fields in declaration order, unmapped ones included
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn identity(&self) -> &FieldDescriptor {
        &self.fields[self.identity]
    }

    /// Fields that produce a column, in schema order
    pub fn columns(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields.iter().filter(|f| f.is_stored())
    }

    /// Stored fields other than the identity, in schema order
    pub fn value_columns(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.columns().filter(|f| !f.is_identity)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
