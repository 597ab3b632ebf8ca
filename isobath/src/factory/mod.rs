//! Isoline factory: the three-tier lookup.
//!
//! ```text
//! get_many(levels)
//!     │
//!     ├─► CacheIndex (resident, evictable)      hit ──► clone
//!     │        │ Unloaded
//!     ├─► ArchiveReader::read_level             ok ──► store + clone
//!     │        │ no archive yet
//!     └─► IsolineSource::read_all ─► ArchiveStore::publish ─► CacheIndex
//! ```
//!
//! The source is consulted at most once per factory, and only when the
//! store has no archive.

mod config;
mod error;
mod orchestrator;
mod populate;
mod stats;

pub use config::{FactoryConfig, DEFAULT_MAX_CACHED_VERTICES};
pub use error::FactoryError;
pub use orchestrator::IsolineFactory;
pub use stats::FactoryStats;
