//! Per-column statistics collection.
//!
//! For every numeric or temporal column one query computes the min/max of
//! its values cast to text; for every boolean column one query counts true
//! and false values (nulls excluded). One round trip per qualifying column.
//!
//! A failed statistics query is recorded as [`ColumnStats::Unavailable`]
//! for that column only; the remaining columns are still collected. The
//! degradation is silent by design, surfaced only at debug level.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::catalog::CatalogColumn;
use crate::sql::{quote_ident, quote_qualified};
use crate::view::{ColumnKey, ColumnStats};

/// Statistical family of a column, derived from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Boolean,
    Other,
}

/// Classifies a declared type name from `information_schema.columns`.
pub fn classify(declared_type: &str) -> ColumnKind {
    match declared_type.to_ascii_lowercase().as_str() {
        "smallint" | "integer" | "bigint" | "real" | "double precision" | "numeric"
        | "decimal" | "money" => ColumnKind::Numeric,
        "date"
        | "timestamp without time zone"
        | "timestamp with time zone"
        | "time without time zone"
        | "time with time zone" => ColumnKind::Temporal,
        "boolean" => ColumnKind::Boolean,
        _ => ColumnKind::Other,
    }
}

/// Returns true when the declared type is a time-of-day type rather than a
/// date or timestamp. Drives the renderer's choice of range format.
pub fn is_time_of_day(declared_type: &str) -> bool {
    matches!(
        declared_type.to_ascii_lowercase().as_str(),
        "time without time zone" | "time with time zone"
    )
}

#[derive(Debug, FromRow)]
struct RangeRow {
    min: Option<String>,
    max: Option<String>,
}

#[derive(Debug, FromRow)]
struct BoolRow {
    true_count: i64,
    false_count: i64,
}

/// Collects statistics for every qualifying column, one query per column.
///
/// The returned map holds an entry for each numeric, temporal, or boolean
/// column; non-qualifying columns are absent.
#[instrument(skip(pool, columns))]
pub async fn collect(pool: &PgPool, columns: &[CatalogColumn]) -> HashMap<ColumnKey, ColumnStats> {
    let mut results = HashMap::new();

    for col in columns {
        let stats = match classify(&col.declared_type) {
            ColumnKind::Numeric | ColumnKind::Temporal => range_stats(pool, col).await,
            ColumnKind::Boolean => bool_stats(pool, col).await,
            ColumnKind::Other => continue,
        };
        results.insert(
            (col.schema.clone(), col.table_name.clone(), col.name.clone()),
            stats,
        );
    }

    results
}

async fn range_stats(pool: &PgPool, col: &CatalogColumn) -> ColumnStats {
    let target = quote_qualified(&col.schema, &col.table_name);
    let ident = quote_ident(&col.name);
    let sql = format!("SELECT min({ident})::text AS min, max({ident})::text AS max FROM {target}");

    match sqlx::query_as::<_, RangeRow>(&sql).fetch_one(pool).await {
        Ok(row) => ColumnStats::Range {
            min: row.min,
            max: row.max,
        },
        Err(e) => {
            tracing::debug!(
                schema = %col.schema,
                table = %col.table_name,
                column = %col.name,
                error = %e,
                "range statistics unavailable"
            );
            ColumnStats::Unavailable
        }
    }
}

async fn bool_stats(pool: &PgPool, col: &CatalogColumn) -> ColumnStats {
    let target = quote_qualified(&col.schema, &col.table_name);
    let ident = quote_ident(&col.name);
    let sql = format!(
        "SELECT count(*) FILTER (WHERE {ident} IS TRUE) AS true_count, \
         count(*) FILTER (WHERE {ident} IS FALSE) AS false_count FROM {target}"
    );

    match sqlx::query_as::<_, BoolRow>(&sql).fetch_one(pool).await {
        Ok(row) => ColumnStats::Bools {
            true_count: row.true_count,
            false_count: row.false_count,
        },
        Err(e) => {
            tracing::debug!(
                schema = %col.schema,
                table = %col.table_name,
                column = %col.name,
                error = %e,
                "boolean statistics unavailable"
            );
            ColumnStats::Unavailable
        }
    }
}
