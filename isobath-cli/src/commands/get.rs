//! `isobath get`: look up isolines by level.

use isobath::config::ConfigFile;
use isobath::Isoline;

use super::common::{build_factory, SourceArgs};
use crate::error::CliError;

/// Print one summary line per requested level, in request order.
pub fn run(levels: &[f64], config: &ConfigFile) -> Result<(), CliError> {
    let factory = build_factory(&SourceArgs::default(), config)?;
    let results = factory.get_many(levels)?;

    for (level, isoline) in levels.iter().zip(&results) {
        println!("{}", summary_line(*level, isoline.as_ref()));
    }

    let stats = factory.stats();
    tracing::debug!(
        hits = stats.cache_hits,
        loads = stats.archive_loads,
        missing = stats.missing_levels,
        "Lookup complete"
    );
    Ok(())
}

fn summary_line(level: f64, isoline: Option<&Isoline>) -> String {
    match isoline {
        Some(iso) => format!(
            "{}\t{}\t{} paths\t{} vertices\t{}",
            level,
            iso.name,
            iso.paths.len(),
            iso.vertex_count(),
            iso.crs
        ),
        None => format!("{}\tnot found", level),
    }
}
