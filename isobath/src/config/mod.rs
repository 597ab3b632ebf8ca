//! User configuration in `~/.isobath/config.ini`.
//!
//! Settings structs live in [`settings`], parsing in `parser` and
//! serialization in `writer`. Missing keys fall back to defaults.

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ArchiveSettings, CacheSettings, ConfigFile, LoggingSettings, SourceSettings,
    DEFAULT_ARCHIVE_FILE, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_FILE,
};
