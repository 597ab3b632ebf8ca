//! Common helpers shared across CLI commands.

use std::path::PathBuf;

use isobath::archive::{ArchiveStore, LocalStore, RemoteStore, ReqwestTransport};
use isobath::config::ConfigFile;
use isobath::source::{IsolineSource, JsonSource, SimplifyingSource};
use isobath::IsolineFactory;

use crate::error::CliError;

/// Source overrides given on the command line.
#[derive(Debug, Default, Clone)]
pub struct SourceArgs {
    pub path: Option<PathBuf>,
    pub tolerance: Option<f64>,
}

/// Build the archive store described by the config.
///
/// A configured URL takes precedence over the local path.
pub fn open_store(config: &ConfigFile) -> Result<Box<dyn ArchiveStore>, CliError> {
    match &config.archive.url {
        Some(url) => {
            let transport = ReqwestTransport::with_timeout(config.archive.timeout)?;
            Ok(Box::new(RemoteStore::new(url.clone(), transport)))
        }
        None => Ok(Box::new(LocalStore::with_access(
            config.archive.path.clone(),
            config.archive.access,
        ))),
    }
}

/// Resolve the isoline source from CLI args and config.
///
/// CLI values take precedence. Returns `None` if no source path is known.
pub fn open_source(
    args: &SourceArgs,
    config: &ConfigFile,
) -> Result<Option<Box<dyn IsolineSource>>, CliError> {
    let Some(path) = args.path.clone().or_else(|| config.source.path.clone()) else {
        return Ok(None);
    };
    let tolerance = args.tolerance.unwrap_or(config.source.tolerance);

    let json = JsonSource::new(path);
    if tolerance > 0.0 {
        Ok(Some(Box::new(SimplifyingSource::new(json, tolerance)?)))
    } else {
        Ok(Some(Box::new(json)))
    }
}

/// Build a factory over the configured store and, if any, source.
pub fn build_factory(args: &SourceArgs, config: &ConfigFile) -> Result<IsolineFactory, CliError> {
    let store = open_store(config)?;
    let factory = match open_source(args, config)? {
        Some(source) => IsolineFactory::new(store, source, config.factory_config()),
        None => IsolineFactory::without_source(store, config.factory_config()),
    };
    Ok(factory)
}
