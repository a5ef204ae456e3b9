//! `renovation` command-line entry point.
//!
//! # Responsibility
//! - Open the local SQLite store and load the room registry.
//! - Dispatch one subcommand, then flush pending writes before exit.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use renovation_core::{default_log_level, init_logging, RoomRegistry, SqliteStore};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("renovation error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("failed to open store `{}`", cli.db.display()))?;
    let mut registry = RoomRegistry::load(Arc::new(store));

    let mutates = cli.command.mutates();
    let result = commands::dispatch(cli.command, &mut registry).await;
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok mutates={mutates}"),
        Err(err) => warn!("event=cli_command module=cli status=error mutates={mutates} error={err}"),
    }

    // The process exits right after dispatch, before any debounce delay elapses.
    if mutates {
        registry.flush();
    }
    result
}
