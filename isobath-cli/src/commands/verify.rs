//! `isobath verify`: check every record of the archive.

use isobath::archive::verify;
use isobath::config::ConfigFile;

use super::common::open_store;
use crate::error::CliError;

/// Decode every record and report problems.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let store = open_store(config)?;
    let Some(mut reader) = store.open()? else {
        return Err(CliError::Config(format!(
            "No archive at {}. Run 'isobath build' first",
            store.describe()
        )));
    };

    println!("Verifying {} ({} access)", store.describe(), reader.access());
    let report = verify(reader.as_mut())?;

    println!("  Levels:   {}", report.levels.len());
    println!("  Readable: {}", report.readable);
    println!("  Vertices: {}", report.vertices);
    for problem in &report.problems {
        println!("  Problem:  {}", problem);
    }
    for entry in &report.stray_entries {
        println!("  Stray:    {}", entry);
    }

    if report.is_clean() {
        println!("Archive OK");
        Ok(())
    } else {
        Err(CliError::VerifyFailed {
            problems: report.problems.len() + report.stray_entries.len(),
        })
    }
}
