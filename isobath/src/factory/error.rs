//! Error types for the isoline factory.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::source::SourceError;

/// Errors surfaced by [`IsolineFactory`](super::IsolineFactory) operations.
///
/// Every variant aborts only the call that raised it; the factory stays
/// usable and a later call may succeed.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Opening, reading or publishing the archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The source could not produce isolines.
    #[error("Isoline source failed: {0}")]
    Source(#[from] SourceError),

    /// The archive existed when the index was built but is gone now.
    #[error("Isoline archive disappeared from {location}")]
    ArchiveMissing { location: String },
}
