//! Level-keyed cache backed by moka.
//!
//! Resident isolines live in a `moka::sync::Cache` weighed by vertex count,
//! so the memory held is bounded and entries may disappear at any time.
//! Whether a level *exists* is tracked separately and never changes.

use std::collections::BTreeSet;
use std::sync::Arc;

use moka::sync::Cache;

use crate::isoline::{Isoline, LevelKey};

/// State of a known level.
#[derive(Debug, Clone)]
pub enum Slot {
    /// The level exists but its isoline is not resident.
    Unloaded,
    /// The isoline is resident.
    Loaded(Arc<Isoline>),
}

/// Fixed set of levels with reclaimable resident isolines.
pub struct CacheIndex {
    levels: Vec<LevelKey>,
    resident: Cache<LevelKey, Arc<Isoline>>,
}

impl CacheIndex {
    /// Build an index over `keys`, holding at most `max_vertices` vertices.
    ///
    /// Duplicate keys are collapsed.
    pub fn new(keys: impl IntoIterator<Item = LevelKey>, max_vertices: u64) -> Self {
        let levels: Vec<LevelKey> = keys
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let resident = Cache::builder()
            // Weight each entry by its vertex count; empty isolines still count
            .weigher(|_key: &LevelKey, value: &Arc<Isoline>| -> u32 {
                value.vertex_count().clamp(1, u32::MAX as usize) as u32
            })
            .max_capacity(max_vertices)
            .build();

        Self { levels, resident }
    }

    /// Returns true if the level is known to exist.
    pub fn contains(&self, key: LevelKey) -> bool {
        self.levels.binary_search(&key).is_ok()
    }

    /// Look up a level.
    ///
    /// Returns `None` if the level is not in the index at all.
    pub fn slot(&self, key: LevelKey) -> Option<Slot> {
        if !self.contains(key) {
            return None;
        }
        match self.resident.get(&key) {
            Some(isoline) => Some(Slot::Loaded(isoline)),
            None => Some(Slot::Unloaded),
        }
    }

    /// Make an isoline resident.
    ///
    /// Returns false, storing nothing, if the level is not in the index.
    pub fn store(&self, key: LevelKey, isoline: Arc<Isoline>) -> bool {
        if !self.contains(key) {
            return false;
        }
        self.resident.insert(key, isoline);
        true
    }

    /// Drop one resident isoline; the level stays known.
    pub fn evict(&self, key: LevelKey) {
        self.resident.invalidate(&key);
    }

    /// Drop every resident isoline; all levels stay known.
    pub fn invalidate_all(&self) {
        self.resident.invalidate_all();
        self.resident.run_pending_tasks();
    }

    /// Known levels, ascending.
    pub fn levels(&self) -> &[LevelKey] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of resident isolines.
    pub fn resident_count(&self) -> u64 {
        // moka is eventually consistent; settle pending work first
        self.resident.run_pending_tasks();
        self.resident.entry_count()
    }

    /// Vertices currently held.
    pub fn resident_vertices(&self) -> u64 {
        self.resident.run_pending_tasks();
        self.resident.weighted_size()
    }
}
