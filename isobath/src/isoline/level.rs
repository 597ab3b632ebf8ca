//! Normalized level keys.
//!
//! Levels are stored in the archive index as 4-byte floats, so the key domain
//! is `f32`. A requested `f64` level is narrowed first, then `-0.0` is folded
//! onto `+0.0`: a depth of "minus zero meters" and "zero meters" is the same
//! contour. `NaN` never forms a key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Archive entry name of the index record.
pub const INDEX_RECORD_NAME: &str = "index";

/// Prefix of every per-level record name.
pub const LEVEL_RECORD_PREFIX: &str = "level/";

/// A normalized, totally ordered isoline level.
#[derive(Debug, Clone, Copy)]
pub struct LevelKey(f32);

impl LevelKey {
    /// Build a key from a requested level.
    ///
    /// Returns `None` for `NaN`.
    pub fn from_level(level: f64) -> Option<Self> {
        Self::from_f32(level as f32)
    }

    /// Build a key from an index entry.
    ///
    /// Returns `None` for `NaN`.
    pub fn from_f32(value: f32) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // -0.0 == 0.0 holds, so this folds both zeros onto +0.0
        if value == 0.0 {
            return Some(Self(0.0));
        }
        Some(Self(value))
    }

    /// The normalized level value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Archive entry name holding this level's record.
    ///
    /// Uses the shortest decimal text that round-trips the `f32`, so distinct
    /// keys always produce distinct names.
    pub fn record_name(self) -> String {
        format!("{}{}", LEVEL_RECORD_PREFIX, self.0.to_string().replace('.', "_"))
    }

    /// Inverse of [`record_name`](Self::record_name).
    pub fn parse_record_name(name: &str) -> Option<Self> {
        let text = name.strip_prefix(LEVEL_RECORD_PREFIX)?;
        let value: f32 = text.replace('_', ".").parse().ok()?;
        Self::from_f32(value)
    }
}

impl PartialEq for LevelKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for LevelKey {}

impl Hash for LevelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for LevelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
