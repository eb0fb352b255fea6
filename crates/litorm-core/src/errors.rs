use thiserror::Error;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every `OrmError` classifies into exactly one kind. Each kind maps to a
/// stable error code that can be used for programmatic handling, logging and
/// test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed or unmappable record type descriptor
    Schema,
    /// A generated statement failed, or identity read-back found nothing
    Commit,
    /// Attempt to reassign an identity that is already set
    IdentityImmutable,
    /// A stored row could not be decoded into a record
    Decode,
    /// Driver failure outside of a batch commit
    Persistence,
    /// Invalid store configuration
    Config,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::Commit => "ERR_COMMIT",
            ExErrorKind::IdentityImmutable => "ERR_IDENTITY_IMMUTABLE",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
        }
    }
}

/// Canonical structured error type
///
/// A flattened, log-friendly view of an `OrmError`: classification plus the
/// table and record the failure relates to.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    record_id: Option<i64>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            record_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add record identity context
    pub fn with_record_id(mut self, id: i64) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(id) = self.record_id {
            write!(f, " (record_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for mapping, loading and committing records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrmError {
    // ===== Schema Errors =====
    /// The record type declares no persisted field at all
    #[error("Record type {table} declares no persisted fields")]
    NoPersistedFields { table: String },

    /// No field is marked as the identity
    #[error("Record type {table} declares no identity field")]
    MissingIdentity { table: String },

    /// More than one field is marked as the identity
    #[error("Record type {table} declares multiple identity fields: {fields:?}")]
    MultipleIdentities { table: String, fields: Vec<String> },

    /// The identity field must be a persisted integer
    #[error("Identity field {field} of {table} must be a persisted integer")]
    InvalidIdentity { table: String, field: String },

    /// No column survives kind mapping, so no DDL can be produced
    #[error("Schema for {table} has no storable columns")]
    EmptySchema { table: String },

    // ===== Commit Errors =====
    /// A generated statement failed to execute
    #[error("{op} on {table} failed: {message}")]
    StatementFailed {
        table: String,
        op: String,
        message: String,
    },

    /// Identity read-back after an insert returned no row
    #[error("Could not read back the identity assigned to a new {table} row")]
    IdentityReadBackEmpty { table: String },

    /// An update matched no row for the record's identity
    #[error("Update of {table} matched no row with identity {id}")]
    RowMissing { table: String, id: i64 },

    /// A field value has no SQL literal form
    #[error("Field {field} of {table} cannot be written: {reason}")]
    UnrepresentableValue {
        table: String,
        field: String,
        reason: String,
    },

    // ===== Identity Errors =====
    /// The identity was already assigned and cannot change
    #[error("Cannot change identity {current} to {attempted}: identities are immutable once set")]
    IdentityImmutable { current: i64, attempted: i64 },

    // ===== Load Errors =====
    /// A row could not be decoded into the record type
    #[error("Cannot decode column {column} of {table}: {reason}")]
    Decode {
        table: String,
        column: String,
        reason: String,
    },

    // ===== Driver / Config Errors =====
    /// Underlying store failure outside a commit
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Invalid store configuration
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl OrmError {
    /// Classify this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            OrmError::NoPersistedFields { .. }
            | OrmError::MissingIdentity { .. }
            | OrmError::MultipleIdentities { .. }
            | OrmError::InvalidIdentity { .. }
            | OrmError::EmptySchema { .. } => ExErrorKind::Schema,
            OrmError::StatementFailed { .. }
            | OrmError::IdentityReadBackEmpty { .. }
            | OrmError::RowMissing { .. }
            | OrmError::UnrepresentableValue { .. } => ExErrorKind::Commit,
            OrmError::IdentityImmutable { .. } => ExErrorKind::IdentityImmutable,
            OrmError::Decode { .. } => ExErrorKind::Decode,
            OrmError::Persistence { .. } => ExErrorKind::Persistence,
            OrmError::Config { .. } => ExErrorKind::Config,
        }
    }

    pub fn is_schema_error(&self) -> bool {
        self.kind() == ExErrorKind::Schema
    }

    pub fn is_commit_error(&self) -> bool {
        self.kind() == ExErrorKind::Commit
    }

    /// Re-tag a driver failure as a failed statement of a commit
    pub fn into_commit_error(self, table: &str, op: &str) -> OrmError {
        match self {
            OrmError::Persistence { message } => OrmError::StatementFailed {
                table: table.to_string(),
                op: op.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl From<OrmError> for ExError {
    fn from(err: OrmError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            OrmError::NoPersistedFields { table }
            | OrmError::MissingIdentity { table }
            | OrmError::MultipleIdentities { table, .. }
            | OrmError::InvalidIdentity { table, .. }
            | OrmError::EmptySchema { table }
            | OrmError::IdentityReadBackEmpty { table }
            | OrmError::UnrepresentableValue { table, .. }
            | OrmError::Decode { table, .. } => base.with_table(table),
            OrmError::StatementFailed { table, op, .. } => base.with_table(table).with_op(op),
            OrmError::RowMissing { table, id } => base.with_table(table).with_record_id(id),
            OrmError::IdentityImmutable { current, .. } => base.with_record_id(current),
            OrmError::Persistence { .. } | OrmError::Config { .. } => base,
        }
    }
}

impl From<&OrmError> for ExError {
    fn from(err: &OrmError) -> Self {
        err.clone().into()
    }
}
