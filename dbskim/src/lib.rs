//! # dbskim: summarize the tables of a live PostgreSQL database
//!
//! dbskim introspects the system catalog of a PostgreSQL database and
//! prints one summary per user table: schema-qualified name, row count
//! (catalog estimate or exact), and a column list annotated with
//! statistical hints (numeric and temporal value ranges, and true/false
//! histograms for boolean columns). It is meant for quick data-quality
//! checks against a live database without writing ad-hoc SQL.
//!
//! ## Pipeline
//!
//! - [`catalog`] enumerates user tables and columns (fatal on failure)
//! - [`stats`] collects per-column min/max and boolean histograms
//!   (per-column failures degrade to an unavailable marker)
//! - [`counts`] optionally counts rows exactly, with bounded concurrency
//!   and a per-query deadline (per-table failures degrade to unknown)
//! - [`view`] joins everything into one display record per table
//! - [`render`] turns the records into plain or decorated terminal text
//!
//! The tool never writes to the database and keeps no state between runs.

pub mod catalog;
pub mod config;
pub mod counts;
pub mod error;
pub mod logging;
pub mod render;
pub mod sql;
pub mod stats;
pub mod view;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::instrument;

use crate::config::Cli;
use crate::render::{DecoratedRenderer, PlainRenderer, Renderer};

pub use crate::error::{Result, SkimError};

/// Runs one summarization pass and returns the rendered output.
///
/// The connection pool is closed before returning, on success and on
/// failure alike.
pub async fn run(cli: &Cli, decorated: bool) -> Result<String> {
    let options = config::connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(cli.concurrency.max(1))
        .connect_with(options)
        .await
        .map_err(SkimError::Connect)?;

    let output = summarize(&pool, cli, decorated).await;
    pool.close().await;
    output
}

#[instrument(skip(pool, cli))]
async fn summarize(pool: &PgPool, cli: &Cli, decorated: bool) -> Result<String> {
    let tables = catalog::list_tables(pool).await?;
    let columns = catalog::list_columns(pool).await?;
    let stats = stats::collect(pool, &columns).await;

    let exact = if cli.exact {
        let options = cli.exact_count_options();
        Some(counts::exact_counts(pool, &tables, &options).await)
    } else {
        None
    };

    let views = view::build_views(tables, columns, stats, exact);

    let renderer: &dyn Renderer = if decorated {
        &DecoratedRenderer
    } else {
        &PlainRenderer
    };
    Ok(renderer.render(&views))
}
