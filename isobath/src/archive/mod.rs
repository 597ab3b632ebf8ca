//! Compressed isoline archive.
//!
//! An archive is a single container holding one uncompressed, checksummed
//! index record followed by one deflated record per level. It is written
//! once, when the factory first populates it, and read-only afterwards.
//!
//! # Access strategies
//!
//! | Backing store            | Strategy                       |
//! |--------------------------|--------------------------------|
//! | Local file               | [`AccessMode::RandomAccess`]   |
//! | Local file (streamed)    | [`AccessMode::SequentialOnly`] |
//! | HTTP ([`RemoteStore`])   | [`AccessMode::SequentialOnly`] |
//!
//! # Example
//!
//! ```ignore
//! use isobath::archive::{ArchiveStore, LocalStore};
//!
//! let store = LocalStore::new("/var/lib/isobath/isolines.isoz");
//! if let Some(mut reader) = store.open()? {
//!     for level in reader.read_index()? {
//!         println!("{}", level);
//!     }
//! }
//! ```

mod error;
pub mod format;
pub mod index;
mod reader;
pub mod record;
mod remote;
mod store;
mod verify;
mod writer;

use std::fmt;
use std::str::FromStr;

pub use error::ArchiveError;
pub use reader::{
    ArchiveReader, ByteStream, FileOpener, RandomAccessReader, SequentialReader, StreamOpener,
};
pub use remote::{RemoteStore, RemoteTransport, ReqwestTransport};
pub use store::{ArchiveStore, LocalStore};
pub use verify::{verify, ArchiveReport, LevelProblem};
pub use writer::ArchiveWriter;

/// How records of an opened archive can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Records are read by name, in any order.
    #[default]
    RandomAccess,
    /// Records are read in container order; going back means reopening.
    SequentialOnly,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::RandomAccess => write!(f, "random"),
            AccessMode::SequentialOnly => write!(f, "sequential"),
        }
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(AccessMode::RandomAccess),
            "sequential" => Ok(AccessMode::SequentialOnly),
            other => Err(format!("unknown access mode '{}'", other)),
        }
    }
}
