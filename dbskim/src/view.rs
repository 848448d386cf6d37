//! Display records and the pure join that produces them.
//!
//! The view builder takes the three independent query results (catalog
//! enumeration, per-column statistics, optional exact counts) and joins them
//! into one [`TableView`] per table. No I/O happens here.

use std::collections::HashMap;

use crate::catalog::CatalogColumn;

/// Key for per-column result maps: (schema, table, column).
pub type ColumnKey = (String, String, String);

/// Key for per-table result maps: (schema, table).
pub type TableKey = (String, String);

/// One user table as enumerated from the catalog.
///
/// Identity is (schema, name). Produced once per run and immutable
/// afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub schema: String,
    pub name: String,
    pub column_count: i64,
    /// Catalog-level row estimate, always non-negative. Never-analyzed
    /// tables report a negative estimate, which is clamped at construction.
    pub estimated_rows: i64,
}

impl TableDescriptor {
    pub fn new(schema: String, name: String, column_count: i64, estimated_rows: i64) -> Self {
        Self {
            schema,
            name,
            column_count,
            estimated_rows: estimated_rows.max(0),
        }
    }

    /// Returns the (schema, table) key for this descriptor.
    pub fn key(&self) -> TableKey {
        (self.schema.clone(), self.name.clone())
    }
}

/// Statistics attached to a single column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnStats {
    /// The column's type does not qualify for statistics.
    #[default]
    None,
    /// Minimum and maximum of a numeric or temporal column, cast to text.
    /// Both bounds are `None` for an empty table.
    Range {
        min: Option<String>,
        max: Option<String>,
    },
    /// True/false value counts of a boolean column, nulls excluded.
    Bools { true_count: i64, false_count: i64 },
    /// The statistics query for this column failed.
    Unavailable,
}

/// One column with its declared type and collected statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
    pub stats: ColumnStats,
}

/// Row-count figure for a table.
///
/// `Unknown` marks a failed or timed-out exact count and is always distinct
/// from `Exact(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    Estimated(i64),
    Exact(i64),
    Unknown,
}

/// Aggregate display record for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub table: TableDescriptor,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: RowCount,
}

/// Joins catalog, statistics, and row-count results into display records.
///
/// Columns keep their declaration order. A table with no column rows gets an
/// empty column list. When `exact_counts` is `Some`, the run is in exact
/// mode and a table missing from the map renders as [`RowCount::Unknown`];
/// otherwise the catalog estimate is used.
pub fn build_views(
    tables: Vec<TableDescriptor>,
    columns: Vec<CatalogColumn>,
    stats: HashMap<ColumnKey, ColumnStats>,
    exact_counts: Option<HashMap<TableKey, RowCount>>,
) -> Vec<TableView> {
    let mut by_table: HashMap<TableKey, Vec<ColumnDescriptor>> = HashMap::new();
    for col in columns {
        let stats = stats
            .get(&(col.schema.clone(), col.table_name.clone(), col.name.clone()))
            .cloned()
            .unwrap_or_default();
        by_table
            .entry((col.schema, col.table_name))
            .or_default()
            .push(ColumnDescriptor {
                name: col.name,
                declared_type: col.declared_type,
                stats,
            });
    }

    tables
        .into_iter()
        .map(|table| {
            let key = table.key();
            let rows = match &exact_counts {
                Some(counts) => counts.get(&key).copied().unwrap_or(RowCount::Unknown),
                None => RowCount::Estimated(table.estimated_rows),
            };
            TableView {
                columns: by_table.remove(&key).unwrap_or_default(),
                table,
                rows,
            }
        })
        .collect()
}
