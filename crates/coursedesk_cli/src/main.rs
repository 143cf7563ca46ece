//! `coursedesk` command-line entry point.
//!
//! # Responsibility
//! - Resolve settings, start logging and open the SQLite slot backend.
//! - Build the catalog once and dispatch one command against it.

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use coursedesk_core::db::open_db;
use coursedesk_core::{init_logging, Catalog, SqliteKeyValueStore};
use log::{error, info};

use cli::Cli;
use config::Settings;

mod cli;
mod commands;
mod config;
mod output;

fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command module=cli status=error");
            output::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<()> {
    let settings = Settings::resolve(&args)?;

    // A broken log directory must not block catalog work.
    if let Err(err) = init_logging(&settings.log_level, &settings.log_dir) {
        output::info(&format!("Logging disabled: {err}"));
    }

    if let Some(parent) = settings.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| anyhow!("Failed to create data directory at: {}", parent.display()))?;
    }
    let conn = open_db(&settings.db_path)
        .with_context(|| anyhow!("Failed to open database at: {}", settings.db_path.display()))?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let mut catalog = Catalog::open(&kv, settings.policy);

    commands::run(&mut catalog, args.command)?;
    info!("event=command module=cli status=ok");
    Ok(())
}
