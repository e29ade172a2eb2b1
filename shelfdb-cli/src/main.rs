//! shelfdb - command-line front end for the book record store

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use shelfdb_engine::RecordStore;

mod commands;
mod config;
mod form;
mod render;

use commands::Command;
use config::Config;

/// shelfdb - book records kept in a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "shelfdb")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./shelfdb.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store file, overriding the config
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database = database;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    // Set up logging
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Using store {}", config.database.display());
    let mut store = RecordStore::open(&config.database)?;

    let output = commands::run(&mut store, &args.command)?;
    print!("{}", output);

    Ok(())
}
