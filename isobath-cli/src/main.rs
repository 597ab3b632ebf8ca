//! Isobath CLI - Command-line interface
//!
//! Builds, inspects and queries isoline archives.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use isobath::config::ConfigFile;
use isobath::logging::{init_logging, LoggingGuard};

use commands::common::SourceArgs;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "isobath")]
#[command(version = isobath::VERSION)]
#[command(about = "Cached bathymetric isoline lookups", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.isobath/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the archive from the source if it does not exist
    Build {
        /// JSON file of isolines (overrides source.path)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Simplification tolerance (overrides source.tolerance)
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// List available levels, ascending
    Levels,

    /// Look up isolines by level
    Get {
        /// Levels to look up
        #[arg(required = true, allow_negative_numbers = true)]
        levels: Vec<f64>,
    },

    /// Check every record of the archive
    Verify,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    if let Commands::Config { command } = cli.command {
        return commands::config::run(command, &config);
    }

    let _guard = start_logging(&config)?;
    tracing::debug!(version = isobath::VERSION, "Starting isobath");

    match cli.command {
        Commands::Build { source, tolerance } => {
            let args = SourceArgs {
                path: source,
                tolerance,
            };
            commands::build::run(args, &config)
        }
        Commands::Levels => commands::levels::run(&config),
        Commands::Get { levels } => commands::get::run(&levels, &config),
        Commands::Verify => commands::verify::run(&config),
        Commands::Config { .. } => Ok(()),
    }
}

fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
