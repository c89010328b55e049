//! txkv CLI
//!
//! Command-line driver for the txkv transactional store.
//!
//! # Commands
//!
//! - `demo` - Walk through the reference begin/put/commit/rollback scenario
//! - `run` - Execute a command script from a file or stdin
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use txkv_core::StoreConfig;

/// Transactional in-memory key-value store.
#[derive(Parser)]
#[command(name = "txkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Clear committed data whenever a transaction begins (legacy behavior)
    #[arg(global = true, long)]
    legacy_begin: bool,

    /// Value reported by GET for keys that were never committed
    #[arg(global = true, long, default_value_t = 0, allow_negative_numbers = true)]
    absent: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the reference transaction scenario
    Demo,

    /// Execute commands (BEGIN, PUT k v, GET k, COMMIT, ROLLBACK)
    Run {
        /// Script file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Stop at the first rejected command
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig::new()
        .reset_committed_on_begin(cli.legacy_begin)
        .absent_value(cli.absent);

    match cli.command {
        Commands::Demo => commands::demo::run(config)?,
        Commands::Run {
            file,
            format,
            fail_fast,
        } => {
            commands::run::run(file.as_deref(), config, &format, fail_fast)?;
        }
        Commands::Version => {
            println!("txkv CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("txkv core v{}", txkv_core::VERSION);
        }
    }

    Ok(())
}
