//! Factory counters.

/// Snapshot of factory activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// Requests answered by a resident isoline.
    pub cache_hits: u64,
    /// Isolines decoded from the archive.
    pub archive_loads: u64,
    /// Requests for levels the index does not know.
    pub missing_levels: u64,
    /// Indexed levels whose record was not in the archive.
    pub missing_records: u64,
    /// Records that failed to decode or held the wrong level.
    pub decode_failures: u64,
    /// Archives published from the source.
    pub populations: u64,
    /// Isolines currently resident.
    pub resident_isolines: u64,
    /// Vertices currently resident.
    pub resident_vertices: u64,
}

impl FactoryStats {
    /// Fraction of resolved requests served from memory.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.archive_loads;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        assert_eq!(FactoryStats::default().hit_rate(), 0.0);

        let stats = FactoryStats {
            cache_hits: 3,
            archive_loads: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }
}
