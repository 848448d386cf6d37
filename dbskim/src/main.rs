//! dbskim binary entry point.
//!
//! Renders the full summary before writing anything, so an interrupted run
//! never produces partial output. Exit code is 0 on success and 1 on any
//! fatal error, with the message on stderr.

use std::io::IsTerminal;

use clap::Parser;

use dbskim::config::Cli;
use dbskim::{logging, SkimError};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let decorated = !cli.plain && std::io::stdout().is_terminal();

    let result = tokio::select! {
        result = dbskim::run(&cli, decorated) => result,
        _ = tokio::signal::ctrl_c() => Err(SkimError::Interrupted),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("dbskim: {e}");
            std::process::exit(1);
        }
    }
}
