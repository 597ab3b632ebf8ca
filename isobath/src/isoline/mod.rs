//! Isoline data model.
//!
//! An [`Isoline`] is a named contour: a set of paths in one coordinate system,
//! tagged with the scalar level it represents (typically a depth in meters).
//! [`LevelKey`] is the normalized, hashable form of a level used by the cache
//! index and the archive.

mod level;
mod types;

pub use level::{LevelKey, INDEX_RECORD_NAME, LEVEL_RECORD_PREFIX};
pub use types::{Isoline, Path, Point};
