//! Read-only queries against the PostgreSQL system catalog.
//!
//! Enumerates user tables and their columns, excluding the `pg_catalog`,
//! `information_schema`, and `pg_*` system schemas. Both operations read the
//! live catalog on every call; nothing is cached. Any failure here aborts
//! the whole run.

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::error::{Result, SkimError};
use crate::view::TableDescriptor;

/// Predicate selecting user tables: plain (`r`) and partitioned (`p`)
/// tables outside the system schemas. Both enumerations embed this same
/// filter so every column row belongs to an enumerated table and every
/// enumerated table gets its column rows.
const USER_TABLE_FILTER: &str = "c.relkind IN ('r', 'p') \
     AND n.nspname NOT IN ('pg_catalog', 'information_schema') \
     AND n.nspname NOT LIKE 'pg\\_%'";

fn tables_sql() -> String {
    format!(
        "SELECT n.nspname::text AS schema, \
                c.relname::text AS name, \
                (SELECT count(*) \
                   FROM pg_catalog.pg_attribute a \
                  WHERE a.attrelid = c.oid \
                    AND a.attnum > 0 \
                    AND NOT a.attisdropped) AS column_count, \
                c.reltuples::bigint AS estimated_rows \
           FROM pg_catalog.pg_class c \
           JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
          WHERE {USER_TABLE_FILTER} \
          ORDER BY n.nspname, c.relname"
    )
}

fn columns_sql() -> String {
    format!(
        "SELECT col.table_schema::text AS schema, \
                col.table_name::text AS table_name, \
                col.column_name::text AS name, \
                col.data_type::text AS declared_type \
           FROM information_schema.columns col \
          WHERE EXISTS (SELECT 1 \
                          FROM pg_catalog.pg_class c \
                          JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                         WHERE n.nspname = col.table_schema::text \
                           AND c.relname = col.table_name::text \
                           AND {USER_TABLE_FILTER}) \
          ORDER BY col.table_schema, col.table_name, col.ordinal_position"
    )
}

/// Raw catalog row for one table.
#[derive(Debug, FromRow)]
struct TableRow {
    schema: String,
    name: String,
    column_count: i64,
    estimated_rows: i64,
}

/// Raw catalog row for one column of a user table.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogColumn {
    pub schema: String,
    pub table_name: String,
    pub name: String,
    pub declared_type: String,
}

/// Lists all user tables with their column counts and row estimates.
///
/// The estimate comes from `pg_class.reltuples`, which the planner refreshes
/// on ANALYZE/VACUUM. Never-analyzed tables report `-1`; the descriptor
/// constructor clamps that to zero.
#[instrument(skip(pool))]
pub async fn list_tables(pool: &PgPool) -> Result<Vec<TableDescriptor>> {
    let sql = tables_sql();
    let rows: Vec<TableRow> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .map_err(SkimError::Catalog)?;

    tracing::debug!(tables = rows.len(), "enumerated user tables");

    Ok(rows
        .into_iter()
        .map(|r| TableDescriptor::new(r.schema, r.name, r.column_count, r.estimated_rows))
        .collect())
}

/// Lists all columns of user tables in declaration order.
#[instrument(skip(pool))]
pub async fn list_columns(pool: &PgPool) -> Result<Vec<CatalogColumn>> {
    let sql = columns_sql();
    let rows: Vec<CatalogColumn> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await
        .map_err(SkimError::Catalog)?;

    tracing::debug!(columns = rows.len(), "enumerated user columns");

    Ok(rows)
}
