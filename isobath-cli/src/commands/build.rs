//! `isobath build`: populate the archive from the source.

use isobath::config::ConfigFile;

use super::common::{build_factory, SourceArgs};
use crate::error::CliError;

/// Populate the archive if it does not exist yet.
pub fn run(args: SourceArgs, config: &ConfigFile) -> Result<(), CliError> {
    let factory = build_factory(&args, config)?;
    let levels = factory.available_values()?;

    if !factory.is_populated() {
        return Err(CliError::Config(
            "No archive exists and no source is configured. \
             Set source.path in config.ini or pass --source"
                .to_string(),
        ));
    }

    let stats = factory.stats();
    if stats.populations > 0 {
        println!(
            "Built archive {} with {} levels",
            factory.describe(),
            levels.len()
        );
    } else {
        println!(
            "Archive {} already exists with {} levels",
            factory.describe(),
            levels.len()
        );
    }
    Ok(())
}
