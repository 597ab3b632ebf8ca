//! Configuration CLI commands.

use clap::Subcommand;
use isobath::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &ConfigFile) -> Result<(), CliError> {
    match command {
        ConfigCommands::List => {
            run_list(config);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
    }
}

fn run_list(config: &ConfigFile) {
    println!("[archive]");
    println!("  path = {}", config.archive.path.display());
    println!("  url = {}", config.archive.url.as_deref().unwrap_or("(not set)"));
    println!("  access = {}", config.archive.access);
    println!("  timeout = {}", config.archive.timeout);
    println!();
    println!("[cache]");
    println!("  max_vertices = {}", config.cache.max_vertices);
    println!();
    println!("[source]");
    match &config.source.path {
        Some(path) => println!("  path = {}", path.display()),
        None => println!("  path = (not set)"),
    }
    println!("  tolerance = {}", config.source.tolerance);
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file = {}", config.logging.file);
}
