//! `isobath levels`: list available levels.

use isobath::config::ConfigFile;

use super::common::{build_factory, SourceArgs};
use crate::error::CliError;

/// Print every available level, ascending, one per line.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let factory = build_factory(&SourceArgs::default(), config)?;
    for level in factory.available_values()? {
        println!("{}", level);
    }
    Ok(())
}
