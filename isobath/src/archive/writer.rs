//! Archive writer.
//!
//! Writes the index first so forward-only readers see it before any level
//! record, then one independently deflated record per isoline in ascending
//! level order.

use std::collections::BTreeMap;
use std::io::Write;

use crate::isoline::{Isoline, LevelKey, INDEX_RECORD_NAME};

use super::error::ArchiveError;
use super::{format, index, record};

/// Serializes a complete population of isolines into a container.
pub struct ArchiveWriter<W> {
    inner: W,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write the whole container and return the underlying writer.
    ///
    /// The map is keyed by normalized level, so the output is sorted and free
    /// of duplicate levels by construction.
    pub fn write_archive(
        mut self,
        population: &BTreeMap<LevelKey, Isoline>,
    ) -> Result<W, ArchiveError> {
        format::write_file_header(&mut self.inner)?;

        let keys: Vec<LevelKey> = population.keys().copied().collect();
        let (header, data) = format::stored_entry(INDEX_RECORD_NAME, index::encode_index(&keys)?)?;
        header.write_to(&mut self.inner)?;
        self.inner.write_all(&data)?;

        let mut compressed_total = 0usize;
        let mut raw_total = 0usize;
        for (key, isoline) in population {
            let payload = record::encode_record(isoline)?;
            let (header, data) = format::deflated_entry(&key.record_name(), &payload)?;
            header.write_to(&mut self.inner)?;
            self.inner.write_all(&data)?;
            raw_total += payload.len();
            compressed_total += data.len();
        }

        format::write_trailer(&mut self.inner)?;
        self.inner.flush()?;

        tracing::debug!(
            levels = keys.len(),
            raw_bytes = raw_total,
            compressed_bytes = compressed_total,
            "Wrote isoline archive"
        );

        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::{EntryHeader, Method};
    use crate::isoline::{Path, Point};
    use std::io::Cursor;

    fn population(levels: &[f64]) -> BTreeMap<LevelKey, Isoline> {
        levels
            .iter()
            .map(|&l| {
                let iso = Isoline::new("contour", l, "EPSG:4326")
                    .with_path(Path::closed(vec![Point::new(0.0, 0.0); 200]));
                (LevelKey::from_level(l).unwrap(), iso)
            })
            .collect()
    }

    fn headers(bytes: Vec<u8>) -> Vec<EntryHeader> {
        let mut cursor = Cursor::new(bytes);
        format::read_file_header(&mut cursor).unwrap();
        let mut headers = Vec::new();
        while let Some(header) = EntryHeader::read_from(&mut cursor).unwrap() {
            format::skip_data(&mut cursor, header.data_len).unwrap();
            headers.push(header);
        }
        headers
    }

    #[test]
    fn test_index_first_then_ascending_levels() {
        let bytes = ArchiveWriter::new(Vec::new())
            .write_archive(&population(&[25.5, -10.0, 0.0]))
            .unwrap();
        let names: Vec<String> = headers(bytes).into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["index", "level/-10", "level/0", "level/25_5"]);
    }

    #[test]
    fn test_index_stored_and_records_deflated() {
        let bytes = ArchiveWriter::new(Vec::new())
            .write_archive(&population(&[1.0]))
            .unwrap();
        let headers = headers(bytes);

        assert!(matches!(headers[0].method, Method::Stored { .. }));
        assert_eq!(headers[0].data_len, 8);
        match headers[1].method {
            Method::Deflate { uncompressed } => assert!(headers[1].data_len < uncompressed),
            Method::Stored { .. } => panic!("level records must be deflated"),
        }
    }

    #[test]
    fn test_empty_population_still_has_index() {
        let bytes = ArchiveWriter::new(Vec::new())
            .write_archive(&BTreeMap::new())
            .unwrap();
        let headers = headers(bytes);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "index");
    }

    #[test]
    fn test_writing_twice_is_deterministic() {
        let first = ArchiveWriter::new(Vec::new())
            .write_archive(&population(&[3.0, -1.0, 2.0]))
            .unwrap();
        let second = ArchiveWriter::new(Vec::new())
            .write_archive(&population(&[2.0, 3.0, -1.0]))
            .unwrap();
        assert_eq!(first, second);
    }
}
