//! Error types for archive operations.

use std::io;

use thiserror::Error;

/// Errors that can occur while reading or writing an isoline archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error while reading or writing the container.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP transport failure for a remote archive.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The stream does not start with the archive magic.
    #[error("Not an isoline archive")]
    BadMagic,

    /// The container was written by an incompatible version.
    #[error("Unsupported archive format version {0}")]
    UnsupportedVersion(u16),

    /// Framing is damaged (truncated stream, unknown method, bad name).
    #[error("Corrupt archive: {0}")]
    Corrupt(String),

    /// The container has no index record.
    #[error("Archive has no index record")]
    MissingIndex,

    /// A stored entry failed its size or digest check.
    #[error("Checksum mismatch for entry '{name}'")]
    ChecksumMismatch { name: String },

    /// The index record declares a different number of levels than it holds.
    #[error("Index declares {declared} levels but holds {actual}")]
    IndexCountMismatch { declared: i32, actual: usize },

    /// A per-level record could not be inflated or deserialized.
    #[error("Failed to decode record '{name}': {reason}")]
    Decode { name: String, reason: String },

    /// A per-level record decoded to a different level than it is filed under.
    #[error("Record '{name}' holds level {found}, expected {expected}")]
    LevelMismatch {
        name: String,
        expected: f32,
        found: f64,
    },

    /// An entry exceeds the container's 32-bit size fields.
    #[error("Entry '{name}' is too large: {size} bytes")]
    EntryTooLarge { name: String, size: usize },
}

impl ArchiveError {
    /// Returns true for errors confined to the content of a single record.
    ///
    /// Such errors degrade one lookup to "no data" instead of failing the
    /// whole operation.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            ArchiveError::Decode { .. }
                | ArchiveError::LevelMismatch { .. }
                | ArchiveError::ChecksumMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_display() {
        let err = ArchiveError::IndexCountMismatch {
            declared: 5,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Index declares 5 levels but holds 3");

        let err = ArchiveError::LevelMismatch {
            name: "level/25_5".to_string(),
            expected: 25.5,
            found: 30.0,
        };
        assert!(err.to_string().contains("level/25_5"));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_content_errors() {
        let decode = ArchiveError::Decode {
            name: "level/1".to_string(),
            reason: "bad".to_string(),
        };
        assert!(decode.is_content_error());
        assert!(!ArchiveError::MissingIndex.is_content_error());
        assert!(!ArchiveError::Http("timeout".to_string()).is_content_error());
    }

    #[test]
    fn test_archive_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
