//! Isobath - Cached bathymetric isoline lookups
//!
//! This library turns a one-shot extraction of contour geometries into a
//! repeatable lookup service. Isolines are resolved through three tiers:
//!
//! ```text
//! ┌──────────────┐   miss   ┌──────────────────┐   no container   ┌────────────┐
//! │ CacheIndex   │ ───────▶ │ Archive (file or │ ───────────────▶ │ Isoline    │
//! │ (moka, LRU)  │          │ HTTP stream)     │                  │ Source     │
//! └──────────────┘          └──────────────────┘                  └────────────┘
//! ```
//!
//! The [`factory::IsolineFactory`] owns all three tiers and always hands out
//! independent copies of the cached isolines.

pub mod archive;
pub mod cache;
pub mod config;
pub mod factory;
pub mod isoline;
pub mod logging;
pub mod source;

pub use factory::{FactoryConfig, FactoryError, IsolineFactory};
pub use isoline::{Isoline, LevelKey, Path, Point};

/// Crate version, embedded in diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
