//! Exact row counting.
//!
//! Estimated counts cost nothing extra; they come straight from the catalog
//! enumeration. Exact mode issues one `count(*)` per table, bounded by a
//! semaphore and optionally by a per-query deadline. Failures and timeouts
//! are isolated per table: the affected table renders as unknown and every
//! other table still gets its count.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::instrument;

use crate::sql::quote_qualified;
use crate::view::{RowCount, TableDescriptor, TableKey};

/// Options governing the exact-count phase.
#[derive(Debug, Clone)]
pub struct ExactCountOptions {
    /// Maximum number of count queries in flight at once. 1 keeps the
    /// sequential baseline.
    pub concurrency: usize,
    /// Per-query deadline. `None` lets each count run to completion.
    pub timeout: Option<Duration>,
}

impl Default for ExactCountOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            timeout: None,
        }
    }
}

/// Counts the rows of every table exactly.
///
/// Each table gets exactly one entry in the returned map. A failed or
/// timed-out query yields [`RowCount::Unknown`] for that table only.
#[instrument(skip(pool, tables), fields(tables = tables.len()))]
pub async fn exact_counts(
    pool: &PgPool,
    tables: &[TableDescriptor],
    options: &ExactCountOptions,
) -> HashMap<TableKey, RowCount> {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for table in tables {
        let pool = pool.clone();
        let semaphore = Arc::clone(&semaphore);
        let key = table.key();
        let target = quote_qualified(&table.schema, &table.name);
        let timeout = options.timeout;

        tasks.spawn(async move {
            // Closing the semaphore is not part of this flow, so acquisition
            // can only fail if the runtime is shutting down.
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (key, RowCount::Unknown),
            };
            let count = count_one(&pool, &target, timeout).await;
            (key, count)
        });
    }

    let mut counts = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        if let Ok((key, count)) = joined {
            counts.insert(key, count);
        }
    }

    // A panicked task leaves its table without an entry; record it as
    // unknown so every table has exactly one figure.
    for table in tables {
        counts.entry(table.key()).or_insert(RowCount::Unknown);
    }

    counts
}

async fn count_one(pool: &PgPool, target: &str, timeout: Option<Duration>) -> RowCount {
    let sql = format!("SELECT count(*) FROM {target}");
    let query = sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool);

    let result = match timeout {
        Some(deadline) => match tokio::time::timeout(deadline, query).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(%target, "exact count timed out");
                return RowCount::Unknown;
            }
        },
        None => query.await,
    };

    match result {
        Ok(count) => RowCount::Exact(count),
        Err(e) => {
            tracing::debug!(%target, error = %e, "exact count failed");
            RowCount::Unknown
        }
    }
}
