//! Archive stores: where a container lives and how it is opened.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::isoline::{Isoline, LevelKey};

use super::error::ArchiveError;
use super::reader::{ArchiveReader, FileOpener, RandomAccessReader, SequentialReader};
use super::writer::ArchiveWriter;
use super::AccessMode;

/// A location that may hold an isoline archive.
///
/// The access strategy is chosen once, when [`open`](Self::open) builds the
/// reader; callers only see the [`ArchiveReader`] contract.
pub trait ArchiveStore: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Open the container.
    ///
    /// Returns `Ok(None)` if no container exists yet.
    fn open(&self) -> Result<Option<Box<dyn ArchiveReader>>, ArchiveError>;

    /// Write a complete container, replacing any previous one.
    fn publish(&self, population: &BTreeMap<LevelKey, Isoline>) -> Result<(), ArchiveError>;
}

/// An archive file on local storage.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    access: AccessMode,
}

impl LocalStore {
    /// A local archive read with random access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_access(path, AccessMode::RandomAccess)
    }

    /// A local archive read with the given strategy.
    pub fn with_access(path: impl Into<PathBuf>, access: AccessMode) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_temp(
        &self,
        temp_path: &Path,
        population: &BTreeMap<LevelKey, Isoline>,
    ) -> Result<(), ArchiveError> {
        let file = File::create(temp_path)?;
        let writer = ArchiveWriter::new(BufWriter::new(file)).write_archive(population)?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        Ok(())
    }
}

impl ArchiveStore for LocalStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Option<Box<dyn ArchiveReader>>, ArchiveError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let reader: Box<dyn ArchiveReader> = match self.access {
            AccessMode::RandomAccess => Box::new(RandomAccessReader::new(BufReader::new(file))?),
            AccessMode::SequentialOnly => Box::new(SequentialReader::from_stream(
                Box::new(file),
                Box::new(FileOpener::new(self.path.clone())),
            )?),
        };
        Ok(Some(reader))
    }

    fn publish(&self, population: &BTreeMap<LevelKey, Isoline>) -> Result<(), ArchiveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, population) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::info!(
            path = %self.path.display(),
            levels = population.len(),
            "Published isoline archive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isoline::{Path as IsoPath, Point};
    use tempfile::TempDir;

    fn population(levels: &[f64]) -> BTreeMap<LevelKey, Isoline> {
        levels
            .iter()
            .map(|&l| {
                let iso = Isoline::new("c", l, "EPSG:4326")
                    .with_path(IsoPath::open(vec![Point::new(l, l), Point::new(l + 1.0, l)]));
                (LevelKey::from_level(l).unwrap(), iso)
            })
            .collect()
    }

    #[test]
    fn test_open_missing_archive_is_none() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path().join("missing.isoz"));
        assert!(store.open().unwrap().is_none());
    }

    #[test]
    fn test_publish_then_open_both_strategies() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("isolines.isoz");
        let levels = population(&[-10.0, 0.0, 25.5]);

        LocalStore::new(&path).publish(&levels).unwrap();
        assert!(path.exists());

        for access in [AccessMode::RandomAccess, AccessMode::SequentialOnly] {
            let store = LocalStore::with_access(&path, access);
            let mut reader = store.open().unwrap().unwrap();
            assert_eq!(reader.access(), access);
            let keys = reader.read_index().unwrap();
            assert_eq!(keys, levels.keys().copied().collect::<Vec<_>>());
            for (key, iso) in &levels {
                assert_eq!(reader.read_level(*key).unwrap().as_ref(), Some(iso));
            }
        }
    }

    #[test]
    fn test_publish_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path().join("isolines.isoz"));
        store.publish(&population(&[1.0])).unwrap();

        assert!(!store.temp_path().exists());
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_publish_failure_leaves_no_archive() {
        let temp = TempDir::new().unwrap();
        // The archive path is an existing directory, so the final rename fails
        let path = temp.path().join("taken");
        fs::create_dir_all(path.join("child")).unwrap();
        let store = LocalStore::new(&path);

        assert!(store.publish(&population(&[1.0])).is_err());
        assert!(!store.temp_path().exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_open_garbage_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("garbage.isoz");
        fs::write(&path, b"definitely not an archive").unwrap();
        assert!(matches!(
            LocalStore::new(&path).open(),
            Err(ArchiveError::BadMagic)
        ));
    }
}
