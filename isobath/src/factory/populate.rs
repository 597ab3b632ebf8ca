//! Turning source output into an archive population.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::isoline::{Isoline, LevelKey};
use crate::source::ExtractedIsoline;

/// Key extracted isolines by level.
///
/// The first isoline seen for a level wins. Isolines without a numeric
/// level cannot be filed and are skipped.
pub(super) fn collect_levels(extracted: Vec<ExtractedIsoline>) -> BTreeMap<LevelKey, Isoline> {
    let mut population = BTreeMap::new();

    for item in extracted {
        let Some(key) = LevelKey::from_level(item.isoline.level) else {
            warn!(name = %item.isoline.name, "Skipping isoline without a numeric level");
            continue;
        };

        info!(
            level = %key,
            vertices = item.isoline.vertex_count(),
            ratio = item.decimation_ratio,
            "Extracted isoline"
        );

        match population.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(item.isoline);
            }
            Entry::Occupied(existing) => {
                warn!(
                    level = %key,
                    kept = %existing.get().name,
                    dropped = %item.isoline.name,
                    "Duplicate isoline level, keeping the first"
                );
            }
        }
    }

    population
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(name: &str, level: f64) -> ExtractedIsoline {
        ExtractedIsoline::unsimplified(Isoline::new(name, level, "EPSG:4326"))
    }

    #[test]
    fn test_collect_sorts_by_level() {
        let population = collect_levels(vec![
            extracted("c", 25.5),
            extracted("a", -10.0),
            extracted("b", 0.0),
        ]);
        let levels: Vec<f32> = population.keys().map(|k| k.value()).collect();
        assert_eq!(levels, vec![-10.0, 0.0, 25.5]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        // -0.0 and 0.0 share a key
        let population = collect_levels(vec![extracted("first", -0.0), extracted("second", 0.0)]);
        assert_eq!(population.len(), 1);
        assert_eq!(population.values().next().unwrap().name, "first");
    }

    #[test]
    fn test_nan_level_skipped() {
        let population = collect_levels(vec![extracted("nan", f64::NAN), extracted("ok", 1.0)]);
        assert_eq!(population.len(), 1);
    }
}
