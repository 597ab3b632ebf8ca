//! Configuration settings and their defaults.

use std::path::PathBuf;

use crate::archive::AccessMode;
use crate::factory::{FactoryConfig, DEFAULT_MAX_CACHED_VERTICES};

use super::file::config_directory;

/// Archive file name inside the config directory.
pub const DEFAULT_ARCHIVE_FILE: &str = "isolines.isoz";

/// Timeout for remote archive requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "isobath.log";

/// Complete user configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub archive: ArchiveSettings,
    pub cache: CacheSettings,
    pub source: SourceSettings,
    pub logging: LoggingSettings,
}

/// `[archive]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSettings {
    /// Local archive file.
    pub path: PathBuf,
    /// Remote archive; takes precedence over `path` when set.
    pub url: Option<String>,
    /// How a local archive is read.
    pub access: AccessMode,
    /// HTTP timeout in seconds.
    pub timeout: u64,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub max_vertices: u64,
}

/// `[source]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// JSON file of isolines used to build a missing archive.
    pub path: Option<PathBuf>,
    /// Douglas–Peucker tolerance; 0 disables simplification.
    pub tolerance: f64,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl ConfigFile {
    /// Factory tuning derived from these settings.
    pub fn factory_config(&self) -> FactoryConfig {
        FactoryConfig::default().with_max_cached_vertices(self.cache.max_vertices)
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            path: config_directory().join(DEFAULT_ARCHIVE_FILE),
            url: None,
            access: AccessMode::default(),
            timeout: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_CACHED_VERTICES,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: None,
            tolerance: 0.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
