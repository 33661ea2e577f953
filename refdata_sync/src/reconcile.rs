//! Coalesce-preserve upsert reconciler.
//!
//! One generic path serves every destination table: the SQL is generated
//! from the record's columns as
//! `INSERT … ON CONFLICT(keys) DO UPDATE SET col = COALESCE(excluded.col,
//! tbl.col)`, so a null candidate column can never erase a stored value and
//! re-running the same input is a no-op. The bookkeeping columns
//! (`data_hash`, `last_updated`) always take the candidate's value so they
//! track the most recent sighting.

use anyhow::Context;
use diesel::sql_types::{BigInt, Bool, Nullable, Text};
use diesel::sqlite::Sqlite;
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection, sql_query};
use tracing::{debug, error};

use crate::record::{FieldValue, Record};

/// Timestamp encoding used for TEXT columns.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Columns the merge overwrites unconditionally instead of coalescing.
const OVERWRITE_COLUMNS: [&str; 2] = ["data_hash", "last_updated"];

/// Destination table descriptor for the generic reconciler.
pub struct TableSpec {
    /// Table name.
    pub table: &'static str,
    /// Conflict-target columns (primary or natural key).
    pub key_columns: &'static [&'static str],
}

/// One-row-per-security identity table.
pub const SECURITY_MASTER: TableSpec = TableSpec {
    table: "security_master",
    key_columns: &["isin_code"],
};

/// Issuer entities, deduplicated by name.
pub const COMPANY_INFO: TableSpec = TableSpec {
    table: "company_info",
    key_columns: &["issuer_name"],
};

/// Headline instrument terms.
pub const SECURITY_BASIC_INFO: TableSpec = TableSpec {
    table: "security_basic_info",
    key_columns: &["isin_code"],
};

/// Long-tail instrument attributes.
pub const SECURITY_DETAIL_INFO: TableSpec = TableSpec {
    table: "security_detail_info",
    key_columns: &["isin_code"],
};

/// Registrar & transfer agent entities, deduplicated by name.
pub const REGISTRAR_INFO: TableSpec = TableSpec {
    table: "registrar_info",
    key_columns: &["rta_name"],
};

/// Result of [`upsert_and_verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The candidate's content hash matched the stored one; nothing written.
    pub skipped_unchanged: bool,
    /// The row was found after the write (or the skip).
    pub verified: bool,
}

/// Canonical TEXT encoding of a field value for binding and key lookups.
fn text_encoding(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Date(d) => Some(d.to_string()),
        FieldValue::Instant(dt) => Some(dt.format(INSTANT_FORMAT).to_string()),
        FieldValue::Decimal(d) => Some(d.normalize().to_string()),
        FieldValue::Integer(n) => Some(n.to_string()),
        FieldValue::Boolean(b) => Some(b.to_string()),
        FieldValue::Null => None,
    }
}

/// Builds the coalesce-preserve upsert statement for `record`'s columns.
fn build_upsert_sql(spec: &TableSpec, record: &Record) -> String {
    let columns: Vec<&str> = record.columns().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    let mut assignments = Vec::new();
    for col in &columns {
        if spec.key_columns.contains(col) {
            continue;
        }
        if OVERWRITE_COLUMNS.contains(col) {
            assignments.push(format!("{col} = excluded.{col}"));
        } else {
            assignments.push(format!(
                "{col} = COALESCE(excluded.{col}, {table}.{col})",
                table = spec.table
            ));
        }
    }

    format!(
        "INSERT INTO {table} ({cols}) VALUES ({placeholders}) \
         ON CONFLICT ({keys}) DO UPDATE SET {assignments}",
        table = spec.table,
        cols = columns.join(", "),
        keys = spec.key_columns.join(", "),
        assignments = assignments.join(", "),
    )
}

type BoxedQuery<'a> =
    diesel::query_builder::BoxedSqlQuery<'a, Sqlite, diesel::query_builder::SqlQuery>;

/// Binds every record value, in column order, onto a boxed query.
fn bind_record<'a>(mut query: BoxedQuery<'a>, record: &Record) -> BoxedQuery<'a> {
    for (_, value) in record.iter() {
        query = match value {
            FieldValue::Integer(n) => query.bind::<Nullable<BigInt>, _>(Some(*n)),
            FieldValue::Boolean(b) => query.bind::<Nullable<Bool>, _>(Some(*b)),
            FieldValue::Null => query.bind::<Nullable<Text>, _>(None::<String>),
            other => query.bind::<Nullable<Text>, _>(text_encoding(other)),
        };
    }
    query
}

/// Key-column values of a record, TEXT-encoded, in spec order.
fn key_values(spec: &TableSpec, record: &Record) -> anyhow::Result<Vec<String>> {
    spec.key_columns
        .iter()
        .map(|col| {
            record
                .get(col)
                .and_then(text_encoding)
                .with_context(|| format!("{}: key column {col} is null", spec.table))
        })
        .collect()
}

/// Executes the coalesce-preserve upsert for one record.
pub fn upsert_record(
    conn: &mut SqliteConnection,
    spec: &TableSpec,
    record: &Record,
) -> anyhow::Result<usize> {
    let sql = build_upsert_sql(spec, record);
    let query = bind_record(sql_query(sql).into_boxed::<Sqlite>(), record);
    query
        .execute(conn)
        .with_context(|| format!("upsert into {}", spec.table))
}

#[derive(QueryableByName)]
struct IdRow {
    #[diesel(sql_type = BigInt)]
    entity_id: i64,
}

/// Upserts and returns the row's surrogate id via `RETURNING`.
pub fn upsert_record_returning_id(
    conn: &mut SqliteConnection,
    spec: &TableSpec,
    record: &Record,
    id_column: &str,
) -> anyhow::Result<i64> {
    let sql = format!(
        "{} RETURNING {id_column} AS entity_id",
        build_upsert_sql(spec, record)
    );
    let query = bind_record(sql_query(sql).into_boxed::<Sqlite>(), record);
    let row: IdRow = query
        .get_result(conn)
        .with_context(|| format!("upsert into {} returning {id_column}", spec.table))?;
    Ok(row.entity_id)
}

#[derive(QueryableByName)]
struct HashRow {
    #[diesel(sql_type = Nullable<Text>)]
    data_hash: Option<String>,
}

/// Stored content hash for the record's key, if the row exists.
pub fn fetch_data_hash(
    conn: &mut SqliteConnection,
    spec: &TableSpec,
    record: &Record,
) -> anyhow::Result<Option<String>> {
    let keys = key_values(spec, record)?;
    let predicate = spec
        .key_columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(" AND ");
    let sql = format!(
        "SELECT data_hash FROM {} WHERE {predicate}",
        spec.table
    );
    let mut query = sql_query(sql).into_boxed::<Sqlite>();
    for key in keys {
        query = query.bind::<Text, _>(key);
    }
    let rows: Vec<HashRow> = query
        .load(conn)
        .with_context(|| format!("fetch data_hash from {}", spec.table))?;
    Ok(rows.into_iter().next().and_then(|r| r.data_hash))
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    cnt: i64,
}

/// Whether a row with the record's key exists.
pub fn row_exists(
    conn: &mut SqliteConnection,
    spec: &TableSpec,
    record: &Record,
) -> anyhow::Result<bool> {
    let keys = key_values(spec, record)?;
    let predicate = spec
        .key_columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(" AND ");
    let sql = format!(
        "SELECT COUNT(*) AS cnt FROM {} WHERE {predicate}",
        spec.table
    );
    let mut query = sql_query(sql).into_boxed::<Sqlite>();
    for key in keys {
        query = query.bind::<Text, _>(key);
    }
    let row: CountRow = query
        .get_result(conn)
        .with_context(|| format!("count rows in {}", spec.table))?;
    Ok(row.cnt > 0)
}

/// Upserts one record with the no-change skip and post-write verification.
///
/// A failed verification is reported in the outcome and at error level, not
/// as an `Err`; the caller decides whether to log a failure row.
pub fn upsert_and_verify(
    conn: &mut SqliteConnection,
    spec: &TableSpec,
    record: &Record,
) -> anyhow::Result<UpsertOutcome> {
    let candidate_hash = record.as_text("data_hash").map(str::to_string);
    if let (Some(candidate), Some(stored)) =
        (&candidate_hash, fetch_data_hash(conn, spec, record)?)
    {
        if *candidate == stored {
            debug!(table = spec.table, "content hash unchanged, skipping write");
            return Ok(UpsertOutcome {
                skipped_unchanged: true,
                verified: true,
            });
        }
    }

    upsert_record(conn, spec, record)?;
    let verified = row_exists(conn, spec, record)?;
    if !verified {
        error!(table = spec.table, "row missing after upsert");
    }
    Ok(UpsertOutcome {
        skipped_unchanged: false,
        verified,
    })
}
