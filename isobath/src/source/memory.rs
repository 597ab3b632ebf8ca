//! Fixed in-memory source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::isoline::Isoline;

use super::{ExtractedIsoline, IsolineSource, SourceError};

/// Source serving a fixed list of isolines.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    isolines: Vec<Isoline>,
    reads: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(isolines: Vec<Isoline>) -> Self {
        Self {
            isolines,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `read_all` calls, readable after the source is moved.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl IsolineSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory isolines", self.isolines.len())
    }

    fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .isolines
            .iter()
            .cloned()
            .map(ExtractedIsoline::unsimplified)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_counts_reads() {
        let mut source = MemorySource::new(vec![
            Isoline::new("a", -10.0, "EPSG:4326"),
            Isoline::new("b", 0.0, "EPSG:4326"),
        ]);
        let reads = source.read_counter();

        let extracted = source.read_all().unwrap();
        assert_eq!(extracted.len(), 2);
        assert!(extracted.iter().all(|e| e.decimation_ratio == 1.0));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(source.describe(), "2 in-memory isolines");
    }
}
