//! Error types for isoline sources.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading an isoline source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read the source file.
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The source content could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The source produced invalid data.
    #[error("Invalid source data: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Parse {
            path: PathBuf::from("/data/bathy.json"),
            reason: "expected array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse /data/bathy.json: expected array"
        );

        let err = SourceError::Invalid("negative tolerance".to_string());
        assert!(err.to_string().contains("negative tolerance"));
    }
}
