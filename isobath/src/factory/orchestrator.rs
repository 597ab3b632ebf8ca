//! The isoline factory.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::archive::{ArchiveReader, ArchiveStore};
use crate::cache::{CacheIndex, Slot};
use crate::isoline::{Isoline, LevelKey};
use crate::source::IsolineSource;

use super::config::FactoryConfig;
use super::error::FactoryError;
use super::populate::collect_levels;
use super::stats::FactoryStats;

/// Resolves levels to isolines through memory, archive and source.
///
/// All operations take one lock for their whole duration, including
/// blocking archive and source I/O, so concurrent callers are serialized.
/// Returned isolines are owned copies; mutating them never touches the
/// cached values.
pub struct IsolineFactory {
    state: Mutex<FactoryState>,
}

struct FactoryState {
    store: Box<dyn ArchiveStore>,
    /// Taken on the first successful extraction.
    source: Option<Box<dyn IsolineSource>>,
    /// Extracted isolines whose publication failed.
    pending: Option<BTreeMap<LevelKey, Isoline>>,
    index: Option<CacheIndex>,
    /// Opened lazily on the first record load.
    reader: Option<Box<dyn ArchiveReader>>,
    config: FactoryConfig,
    stats: FactoryStats,
}

impl IsolineFactory {
    /// Create a factory over `store`, populating it from `source` if needed.
    pub fn new(
        store: Box<dyn ArchiveStore>,
        source: Box<dyn IsolineSource>,
        config: FactoryConfig,
    ) -> Self {
        Self::build(store, Some(source), config)
    }

    /// Create a factory that only reads an existing archive.
    pub fn without_source(store: Box<dyn ArchiveStore>, config: FactoryConfig) -> Self {
        Self::build(store, None, config)
    }

    fn build(
        store: Box<dyn ArchiveStore>,
        source: Option<Box<dyn IsolineSource>>,
        config: FactoryConfig,
    ) -> Self {
        Self {
            state: Mutex::new(FactoryState {
                store,
                source,
                pending: None,
                index: None,
                reader: None,
                config,
                stats: FactoryStats::default(),
            }),
        }
    }

    /// All known levels, ascending.
    ///
    /// Opens the archive, or populates it from the source, on first use
    /// without loading any isoline. Empty if neither exists.
    pub fn available_values(&self) -> Result<Vec<f64>, FactoryError> {
        let mut state = self.state.lock();
        state.ensure_index()?;
        Ok(state
            .index
            .as_ref()
            .map(|index| {
                index
                    .levels()
                    .iter()
                    .map(|key| f64::from(key.value()))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// The isoline for one level, if there is one.
    pub fn get(&self, level: f64) -> Result<Option<Isoline>, FactoryError> {
        Ok(self.get_many(&[level])?.into_iter().next().flatten())
    }

    /// The isolines for `levels`, in request order.
    ///
    /// Requests are served in ascending level order so a forward-only
    /// archive is scanned once. Unknown levels and records that fail to
    /// decode give `None` without failing the call.
    pub fn get_many(&self, levels: &[f64]) -> Result<Vec<Option<Isoline>>, FactoryError> {
        let mut state = self.state.lock();
        state.ensure_index()?;

        let mut results: Vec<Option<Isoline>> = vec![None; levels.len()];
        if state.index.is_none() {
            return Ok(results);
        }

        let mut order: Vec<(LevelKey, usize)> = Vec::with_capacity(levels.len());
        for (position, &level) in levels.iter().enumerate() {
            match LevelKey::from_level(level) {
                Some(key) => order.push((key, position)),
                None => warn!(level, "Ignoring request for a level that is not a number"),
            }
        }
        order.sort_unstable();

        let mut previous: Option<(LevelKey, Option<Arc<Isoline>>)> = None;
        for (key, position) in order {
            let repeated = match &previous {
                Some((last, value)) if *last == key => Some(value.clone()),
                _ => None,
            };
            let value = match repeated {
                Some(value) => value,
                None => {
                    let value = state.resolve(key)?;
                    previous = Some((key, value.clone()));
                    value
                }
            };
            results[position] = value.map(|isoline| (*isoline).clone());
        }

        Ok(results)
    }

    /// Activity counters.
    pub fn stats(&self) -> FactoryStats {
        let state = self.state.lock();
        let mut stats = state.stats;
        if let Some(index) = &state.index {
            stats.resident_isolines = index.resident_count();
            stats.resident_vertices = index.resident_vertices();
        }
        stats
    }

    /// Returns true once the index has been built from an archive.
    pub fn is_populated(&self) -> bool {
        self.state.lock().index.is_some()
    }

    /// Drop every resident isoline; they reload from the archive on demand.
    pub fn release_memory(&self) {
        if let Some(index) = &self.state.lock().index {
            index.invalidate_all();
        }
    }

    /// Location of the backing archive, for logs.
    pub fn describe(&self) -> String {
        self.state.lock().store.describe()
    }
}

impl FactoryState {
    fn ensure_index(&mut self) -> Result<(), FactoryError> {
        if self.index.is_some() {
            return Ok(());
        }

        match self.store.open()? {
            Some(mut reader) => {
                let keys = reader.read_index()?;
                info!(
                    archive = %self.store.describe(),
                    access = %reader.access(),
                    levels = keys.len(),
                    "Opened isoline archive"
                );
                self.index = Some(CacheIndex::new(keys, self.config.max_cached_vertices));
                self.reader = Some(reader);
                Ok(())
            }
            None => self.populate(),
        }
    }

    fn populate(&mut self) -> Result<(), FactoryError> {
        let population = match self.pending.take() {
            Some(population) => population,
            None => {
                let Some(mut source) = self.source.take() else {
                    warn!(
                        archive = %self.store.describe(),
                        "No isoline archive and no source to build one"
                    );
                    return Ok(());
                };
                info!(source = %source.describe(), "Extracting isolines");
                match source.read_all() {
                    Ok(extracted) => collect_levels(extracted),
                    Err(e) => {
                        // Extraction did not happen; allow a retry
                        self.source = Some(source);
                        return Err(e.into());
                    }
                }
            }
        };

        if let Err(e) = self.store.publish(&population) {
            self.pending = Some(population);
            return Err(e.into());
        }
        self.stats.populations += 1;

        info!(
            archive = %self.store.describe(),
            levels = population.len(),
            "Populated isoline archive"
        );

        let index = CacheIndex::new(population.keys().copied(), self.config.max_cached_vertices);
        for (key, isoline) in population {
            index.store(key, Arc::new(isoline));
        }
        self.index = Some(index);
        Ok(())
    }

    fn resolve(&mut self, key: LevelKey) -> Result<Option<Arc<Isoline>>, FactoryError> {
        let Some(index) = self.index.as_ref() else {
            return Ok(None);
        };

        match index.slot(key) {
            Some(Slot::Loaded(isoline)) => {
                self.stats.cache_hits += 1;
                debug!(level = %key, "Isoline cache hit");
                Ok(Some(isoline))
            }
            Some(Slot::Unloaded) => self.load(key),
            None => {
                self.stats.missing_levels += 1;
                warn!(level = %key, "Requested level is not in the isoline index");
                Ok(None)
            }
        }
    }

    fn load(&mut self, key: LevelKey) -> Result<Option<Arc<Isoline>>, FactoryError> {
        let mut reader = match self.reader.take() {
            Some(reader) => reader,
            None => self
                .store
                .open()?
                .ok_or_else(|| FactoryError::ArchiveMissing {
                    location: self.store.describe(),
                })?,
        };

        match reader.read_level(key) {
            Ok(Some(isoline)) => {
                self.reader = Some(reader);
                let isoline = Arc::new(isoline);
                if let Some(index) = &self.index {
                    index.store(key, Arc::clone(&isoline));
                }
                self.stats.archive_loads += 1;
                info!(
                    level = %key,
                    vertices = isoline.vertex_count(),
                    "Loaded isoline"
                );
                Ok(Some(isoline))
            }
            Ok(None) => {
                self.reader = Some(reader);
                self.stats.missing_records += 1;
                warn!(level = %key, "Indexed level has no record in the archive");
                Ok(None)
            }
            Err(e) if e.is_content_error() => {
                self.reader = Some(reader);
                self.stats.decode_failures += 1;
                error!(level = %key, error = %e, "Failed to decode isoline record");
                Ok(None)
            }
            // The reader is dropped; the next load reopens the archive
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveError, LocalStore};
    use crate::isoline::{Path, Point};
    use crate::source::{ExtractedIsoline, MemorySource, SourceError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn isoline(level: f64) -> Isoline {
        Isoline::new(format!("depth {}", level), level, "EPSG:4326").with_path(Path::open(vec![
            Point::new(level, 0.0),
            Point::new(level, 1.0),
            Point::new(level + 1.0, 1.0),
        ]))
    }

    fn memory_source(levels: &[f64]) -> MemorySource {
        MemorySource::new(levels.iter().map(|&l| isoline(l)).collect())
    }

    /// Local store whose publication can be made to fail.
    struct FlakyStore {
        inner: LocalStore,
        fail_publish: Arc<AtomicBool>,
    }

    impl ArchiveStore for FlakyStore {
        fn describe(&self) -> String {
            self.inner.describe()
        }

        fn open(&self) -> Result<Option<Box<dyn ArchiveReader>>, ArchiveError> {
            self.inner.open()
        }

        fn publish(&self, population: &BTreeMap<LevelKey, Isoline>) -> Result<(), ArchiveError> {
            if self.fail_publish.load(Ordering::SeqCst) {
                return Err(ArchiveError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only storage",
                )));
            }
            self.inner.publish(population)
        }
    }

    /// Source failing its first `failures` reads.
    struct UnreliableSource {
        failures: usize,
        reads: Arc<AtomicUsize>,
    }

    impl IsolineSource for UnreliableSource {
        fn describe(&self) -> String {
            "unreliable".to_string()
        }

        fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(SourceError::Invalid("grid not ready".to_string()));
            }
            Ok(vec![ExtractedIsoline::unsimplified(isoline(5.0))])
        }
    }

    #[test]
    fn test_population_preloads_cache() {
        let temp = TempDir::new().unwrap();
        let factory = IsolineFactory::new(
            Box::new(LocalStore::new(temp.path().join("a.isoz"))),
            Box::new(memory_source(&[1.0, 2.0])),
            FactoryConfig::default(),
        );

        assert!(!factory.is_populated());
        assert_eq!(factory.get(2.0).unwrap(), Some(isoline(2.0)));
        assert!(factory.is_populated());

        let stats = factory.stats();
        assert_eq!(stats.populations, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.archive_loads, 0);
    }

    #[test]
    fn test_publish_failure_keeps_extraction() {
        let temp = TempDir::new().unwrap();
        let fail = Arc::new(AtomicBool::new(true));
        let source = memory_source(&[1.0]);
        let reads = source.read_counter();
        let factory = IsolineFactory::new(
            Box::new(FlakyStore {
                inner: LocalStore::new(temp.path().join("a.isoz")),
                fail_publish: Arc::clone(&fail),
            }),
            Box::new(source),
            FactoryConfig::default(),
        );

        assert!(matches!(
            factory.available_values(),
            Err(FactoryError::Archive(ArchiveError::Io(_)))
        ));
        assert!(!factory.is_populated());

        fail.store(false, Ordering::SeqCst);
        assert_eq!(factory.available_values().unwrap(), vec![1.0]);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(temp.path().join("a.isoz").exists());
    }

    #[test]
    fn test_failed_extraction_is_retried() {
        let temp = TempDir::new().unwrap();
        let reads = Arc::new(AtomicUsize::new(0));
        let factory = IsolineFactory::new(
            Box::new(LocalStore::new(temp.path().join("a.isoz"))),
            Box::new(UnreliableSource {
                failures: 1,
                reads: Arc::clone(&reads),
            }),
            FactoryConfig::default(),
        );

        assert!(matches!(
            factory.get(5.0),
            Err(FactoryError::Source(SourceError::Invalid(_)))
        ));
        assert_eq!(factory.get(5.0).unwrap(), Some(isoline(5.0)));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_archive_no_source_is_empty() {
        let temp = TempDir::new().unwrap();
        let factory = IsolineFactory::without_source(
            Box::new(LocalStore::new(temp.path().join("none.isoz"))),
            FactoryConfig::default(),
        );

        assert!(factory.available_values().unwrap().is_empty());
        assert_eq!(factory.get_many(&[1.0, 2.0]).unwrap(), vec![None, None]);
        assert!(!factory.is_populated());
    }

    #[test]
    fn test_release_memory_reloads_from_archive() {
        let temp = TempDir::new().unwrap();
        let factory = IsolineFactory::new(
            Box::new(LocalStore::new(temp.path().join("a.isoz"))),
            Box::new(memory_source(&[1.0, 2.0])),
            FactoryConfig::default(),
        );
        factory.available_values().unwrap();

        factory.release_memory();
        assert_eq!(factory.stats().resident_isolines, 0);

        assert_eq!(factory.get(1.0).unwrap(), Some(isoline(1.0)));
        assert_eq!(factory.get(1.0).unwrap(), Some(isoline(1.0)));
        let stats = factory.stats();
        assert_eq!(stats.archive_loads, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_duplicate_requests_resolve_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.isoz");
        IsolineFactory::new(
            Box::new(LocalStore::new(&path)),
            Box::new(memory_source(&[1.0])),
            FactoryConfig::default(),
        )
        .available_values()
        .unwrap();

        let factory = IsolineFactory::without_source(
            Box::new(LocalStore::new(&path)),
            FactoryConfig::default(),
        );
        let results = factory.get_many(&[1.0, 1.0, 1.0]).unwrap();
        assert!(results.iter().all(|r| r.as_ref() == Some(&isoline(1.0))));
        assert_eq!(factory.stats().archive_loads, 1);
        assert_eq!(factory.stats().cache_hits, 0);
    }

    #[test]
    fn test_nan_request_is_absent() {
        let temp = TempDir::new().unwrap();
        let factory = IsolineFactory::new(
            Box::new(LocalStore::new(temp.path().join("a.isoz"))),
            Box::new(memory_source(&[1.0])),
            FactoryConfig::default(),
        );
        assert_eq!(
            factory.get_many(&[f64::NAN, 1.0]).unwrap(),
            vec![None, Some(isoline(1.0))]
        );
    }
}
