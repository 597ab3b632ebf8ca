//! Isoline sources.
//!
//! A source materializes every isoline at once. The factory calls it only
//! when no archive exists yet, and feeds the result straight into the
//! archive writer and the cache index.
//!
//! # Implementations
//!
//! - [`MemorySource`] - a fixed list of isolines
//! - [`JsonSource`] - isolines stored as a JSON array in a file
//! - [`SimplifyingSource`] - decimates the output of another source

mod error;
mod json;
mod memory;
mod simplify;

pub use error::SourceError;
pub use json::JsonSource;
pub use memory::MemorySource;
pub use simplify::{simplify_path, SimplifyingSource};

use crate::isoline::Isoline;

/// An isoline together with the decimation its source applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedIsoline {
    pub isoline: Isoline,
    /// Input vertices per kept vertex; `1.0` when nothing was removed.
    pub decimation_ratio: f64,
}

impl ExtractedIsoline {
    /// Wrap an isoline that was not simplified.
    pub fn unsimplified(isoline: Isoline) -> Self {
        Self {
            isoline,
            decimation_ratio: 1.0,
        }
    }
}

/// Produces the full set of isolines.
pub trait IsolineSource: Send {
    /// Human-readable description, for logs.
    fn describe(&self) -> String;

    /// Materialize every isoline.
    fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError>;
}

impl<S: IsolineSource + ?Sized> IsolineSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError> {
        (**self).read_all()
    }
}
