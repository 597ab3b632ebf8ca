//! JSON file source.
//!
//! The file holds an array of isolines:
//!
//! ```json
//! [
//!   {
//!     "name": "-200 m",
//!     "level": -200.0,
//!     "crs": "EPSG:4326",
//!     "paths": [
//!       { "points": [{ "x": -5.1, "y": 47.3 }, { "x": -5.0, "y": 47.4 }], "closed": false }
//!     ]
//!   }
//! ]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::isoline::Isoline;

use super::{ExtractedIsoline, IsolineSource, SourceError};

/// Source reading isolines from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IsolineSource for JsonSource {
    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }

    fn read_all(&mut self) -> Result<Vec<ExtractedIsoline>, SourceError> {
        let file = File::open(&self.path).map_err(|e| SourceError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        let isolines: Vec<Isoline> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| SourceError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            path = %self.path.display(),
            count = isolines.len(),
            "Read isolines from JSON"
        );

        Ok(isolines
            .into_iter()
            .map(ExtractedIsoline::unsimplified)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_isoline_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("isolines.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "-10 m", "level": -10.0, "crs": "EPSG:4326",
                 "paths": [{"points": [{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 4.0}],
                            "closed": false}]},
                {"name": "0 m", "level": 0.0, "crs": "EPSG:4326", "paths": []}
            ]"#,
        )
        .unwrap();

        let mut source = JsonSource::new(&path);
        let extracted = source.read_all().unwrap();

        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted[0].isoline.level, -10.0);
        assert_eq!(extracted[0].isoline.vertex_count(), 2);
        assert!(extracted[1].isoline.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut source = JsonSource::new("/nonexistent/isolines.json");
        assert!(matches!(source.read_all(), Err(SourceError::Read { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let err = JsonSource::new(&path).read_all().unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
