//! Table-level entry points: create, load and save records of one type
//!
//! These tie the introspector, statement generator, snapshot engine and
//! commit orchestrator together over the cached schema of `R`.

use crate::commit::{commit_batch, CommitOptions, CommitSummary};
use crate::connection::StoreConnection;
use crate::errors::Result;
use crate::introspect::{schema_for, table_exists};
use crate::model::{ColumnSchema, Record};
use crate::snapshot::compute_snapshot;
use crate::statements;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Create the table for `R` unless it already exists.
///
/// Returns `true` when the table was created by this call.
pub fn ensure_table<R: Record, C: StoreConnection + ?Sized>(conn: &C) -> Result<bool> {
    let schema = schema_for::<R>()?;
    if table_exists(conn, &schema)? {
        return Ok(false);
    }

    let sql = statements::create_table(&schema)?;
    tracing::debug!(table = schema.table(), statement = %sql, "create table");
    conn.execute(&sql)?;
    tracing::info!(table = schema.table(), "table created");
    Ok(true)
}

/// Load every row of `R`'s table.
///
/// Each record gets its stored identity and a baseline snapshot, so an
/// unmodified record is skipped by the next commit.
pub fn load_all<R: Record, C: StoreConnection + ?Sized>(conn: &C) -> Result<Vec<R>> {
    let schema = schema_for::<R>()?;
    log_op_start!("load_all", table = schema.table());
    let start = Instant::now();

    let result = decode_all::<R, C>(conn, &schema);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(records) => {
            log_op_end!(
                "load_all",
                duration_ms = duration_ms,
                table = schema.table(),
                rows = records.len()
            );
        }
        Err(err) => {
            log_op_error!("load_all", err, duration_ms = duration_ms, table = schema.table());
        }
    }
    result
}

fn decode_all<R: Record, C: StoreConnection + ?Sized>(
    conn: &C,
    schema: &ColumnSchema,
) -> Result<Vec<R>> {
    let rows = conn.query(&statements::select_all(schema))?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row.conform(schema)?;
        let mut record = R::from_row(&row)?;
        record.set_id(row.get_i64(schema.identity().name)?)?;
        let baseline = compute_snapshot(schema, &record);
        record.meta_mut().replace_baseline(baseline);
        records.push(record);
    }
    Ok(records)
}

/// Commit a batch of `R` with default options
pub fn commit<R: Record, C: StoreConnection + ?Sized>(
    conn: &C,
    batch: &mut [R],
) -> Result<CommitSummary> {
    commit_with::<R, C>(conn, batch, &CommitOptions::default())
}

/// Commit a batch of `R` with explicit options
pub fn commit_with<R: Record, C: StoreConnection + ?Sized>(
    conn: &C,
    batch: &mut [R],
    options: &CommitOptions,
) -> Result<CommitSummary> {
    let schema = schema_for::<R>()?;
    commit_batch(conn, &schema, batch, options)
}
