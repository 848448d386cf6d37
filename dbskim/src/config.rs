//! CLI flags and connection configuration.
//!
//! Connection settings come from the environment, never from the command
//! line: either a single `DATABASE_URL` connection string or the discrete
//! `PGHOST`/`PGPORT`/`PGDATABASE`/`PGUSER`/`PGPASSWORD`/`PGSSLMODE`
//! variables. A local `.env` file, when present, is loaded into the
//! environment before either is read.

use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgConnectOptions;

use crate::counts::ExactCountOptions;
use crate::error::{Result, SkimError};

/// Command-line options.
///
/// `ignore_errors` keeps parsing lenient: unrecognized flags are tolerated
/// rather than rejected.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dbskim",
    about = "Summarize the tables of a live PostgreSQL database",
    version,
    ignore_errors = true
)]
pub struct Cli {
    /// Count rows exactly instead of using catalog estimates.
    #[arg(long)]
    pub exact: bool,

    /// Maximum number of concurrent exact-count queries. Declared as `u32`
    /// so the figure also sizes the connection pool without narrowing.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub concurrency: u32,

    /// Per-query deadline for exact counts, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub statement_timeout_ms: Option<u64>,

    /// Force plain text output even when stdout is a terminal.
    #[arg(long)]
    pub plain: bool,
}

impl Cli {
    /// Options for the exact-count phase. Concurrency is clamped to at
    /// least one so a stray `--concurrency=0` keeps the sequential
    /// baseline instead of deadlocking.
    pub fn exact_count_options(&self) -> ExactCountOptions {
        ExactCountOptions {
            concurrency: self.concurrency.max(1) as usize,
            timeout: self.statement_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Resolves connection options from the environment.
///
/// `DATABASE_URL` wins when set; otherwise the discrete `PG*` variables are
/// picked up through [`PgConnectOptions::new`], which reads them itself.
pub fn connect_options() -> Result<PgConnectOptions> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => parse_url(&url),
        Err(_) => Ok(PgConnectOptions::new()),
    }
}

fn parse_url(url: &str) -> Result<PgConnectOptions> {
    url.parse()
        .map_err(|e| SkimError::configuration(format!("invalid DATABASE_URL: {e}")))
}
