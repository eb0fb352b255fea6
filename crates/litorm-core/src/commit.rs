//! Transactional batch commit
//!
//! Inserts unsaved records and updates dirty ones inside a single
//! transaction. Clean records issue no statement at all.
//!
//! ## Failure semantics
//!
//! The first failing statement aborts the batch: the transaction is rolled
//! back and the error is returned. Identities and baselines produced while
//! the transaction was open are staged and only written onto the records
//! after the commit succeeds, so a failed batch leaves every record exactly
//! as the caller passed it in.

use crate::connection::StoreConnection;
use crate::errors::{OrmError, Result};
use crate::model::{ColumnSchema, Record};
use crate::snapshot::{compute_snapshot, compute_snapshot_with_identity, is_dirty, Snapshot};
use crate::statements;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// How a freshly inserted row's identity is recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityReadBack {
    /// The connection's native last-inserted-identity primitive
    #[default]
    LastInsertRowId,
    /// `SELECT` the highest identity in the table.
    ///
    /// Wrong as soon as another session inserts into the same table between
    /// the insert and the read-back.
    MaxIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOptions {
    pub identity_read_back: IdentityReadBack,
}

/// Per-batch outcome counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl CommitSummary {
    /// Number of statements that wrote rows
    pub fn statements(&self) -> usize {
        self.inserted + self.updated
    }
}

enum Staged {
    Inserted {
        index: usize,
        id: i64,
        snapshot: Snapshot,
    },
    Updated {
        index: usize,
        snapshot: Snapshot,
    },
}

/// Commit a batch of records of one type.
///
/// # Errors
///
/// Returns a commit error when any statement, the identity read-back, or the
/// transaction boundaries fail. The transaction is rolled back first.
pub fn commit_batch<C, R>(
    conn: &C,
    schema: &ColumnSchema,
    batch: &mut [R],
    options: &CommitOptions,
) -> Result<CommitSummary>
where
    C: StoreConnection + ?Sized,
    R: Record,
{
    let table = schema.table();
    log_op_start!("commit_batch", table = table, batch_len = batch.len());
    let start = Instant::now();

    let result = run_in_transaction(conn, schema, batch, options);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok((staged, summary)) => {
            apply_staged(batch, staged)?;
            log_op_end!(
                "commit_batch",
                duration_ms = duration_ms,
                table = table,
                inserted = summary.inserted,
                updated = summary.updated,
                unchanged = summary.unchanged
            );
            Ok(summary)
        }
        Err(err) => {
            log_op_error!("commit_batch", &err, duration_ms = duration_ms, table = table);
            Err(err)
        }
    }
}

fn run_in_transaction<C, R>(
    conn: &C,
    schema: &ColumnSchema,
    batch: &[R],
    options: &CommitOptions,
) -> Result<(Vec<Staged>, CommitSummary)>
where
    C: StoreConnection + ?Sized,
    R: Record,
{
    let table = schema.table();
    conn.begin()
        .map_err(|e| e.into_commit_error(table, "begin"))?;

    let staged = match stage_batch(conn, schema, batch, options) {
        Ok(staged) => staged,
        Err(err) => {
            roll_back(conn, table);
            return Err(err);
        }
    };

    if let Err(err) = conn.commit() {
        roll_back(conn, table);
        return Err(err.into_commit_error(table, "commit"));
    }

    Ok(staged)
}

fn roll_back<C: StoreConnection + ?Sized>(conn: &C, table: &str) {
    if let Err(err) = conn.rollback() {
        tracing::warn!(table = table, error = %err, "rollback failed");
    }
}

fn stage_batch<C, R>(
    conn: &C,
    schema: &ColumnSchema,
    batch: &[R],
    options: &CommitOptions,
) -> Result<(Vec<Staged>, CommitSummary)>
where
    C: StoreConnection + ?Sized,
    R: Record,
{
    let table = schema.table();
    let mut staged = Vec::new();
    let mut summary = CommitSummary::default();

    for (index, record) in batch.iter().enumerate() {
        if record.is_new() {
            let sql = statements::insert(schema, record)?;
            tracing::debug!(table = table, statement = %sql, "insert");
            conn.execute(&sql)
                .map_err(|e| e.into_commit_error(table, "insert"))?;

            let id = read_back_identity(conn, schema, options.identity_read_back)?;
            staged.push(Staged::Inserted {
                index,
                id,
                snapshot: compute_snapshot_with_identity(schema, record, id),
            });
            summary.inserted += 1;
            continue;
        }

        if !is_dirty(schema, record) {
            summary.unchanged += 1;
            continue;
        }

        let sql = statements::update(schema, record)?;
        tracing::debug!(table = table, record_id = record.id(), statement = %sql, "update");
        let affected = conn
            .execute(&sql)
            .map_err(|e| e.into_commit_error(table, "update"))?;
        if affected == 0 {
            return Err(OrmError::RowMissing {
                table: table.to_string(),
                id: record.id(),
            });
        }

        staged.push(Staged::Updated {
            index,
            snapshot: compute_snapshot(schema, record),
        });
        summary.updated += 1;
    }

    Ok((staged, summary))
}

fn read_back_identity<C: StoreConnection + ?Sized>(
    conn: &C,
    schema: &ColumnSchema,
    strategy: IdentityReadBack,
) -> Result<i64> {
    let table = schema.table();
    let id = match strategy {
        IdentityReadBack::LastInsertRowId => conn
            .last_insert_id()
            .map_err(|e| e.into_commit_error(table, "identity_read_back"))?,
        IdentityReadBack::MaxIdentity => {
            let rows = conn
                .query(&statements::identity_read_back(schema))
                .map_err(|e| e.into_commit_error(table, "identity_read_back"))?;
            rows.first()
                .and_then(|row| row.get(schema.identity().name))
                .and_then(|v| v.as_i64())
        }
    };

    match id {
        Some(id) if id != 0 => Ok(id),
        _ => Err(OrmError::IdentityReadBackEmpty {
            table: table.to_string(),
        }),
    }
}

fn apply_staged<R: Record>(batch: &mut [R], staged: Vec<Staged>) -> Result<()> {
    for change in staged {
        match change {
            Staged::Inserted {
                index,
                id,
                snapshot,
            } => {
                let meta = batch[index].meta_mut();
                meta.set_id(id)?;
                meta.replace_baseline(snapshot);
            }
            Staged::Updated { index, snapshot } => {
                batch[index].meta_mut().replace_baseline(snapshot);
            }
        }
    }
    Ok(())
}
