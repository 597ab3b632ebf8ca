//! Archive integrity check.
//!
//! Reads the index, then decodes every listed record. Per-level problems are
//! collected into the report; transport failures abort the check.

use std::collections::BTreeSet;
use std::fmt;

use crate::isoline::{LevelKey, INDEX_RECORD_NAME};

use super::error::ArchiveError;
use super::reader::ArchiveReader;

/// Something wrong with one indexed level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelProblem {
    /// The index lists the level but no record exists.
    Missing(LevelKey),
    /// The record exists but cannot be decoded or is filed under the wrong level.
    Unreadable { level: LevelKey, reason: String },
}

impl fmt::Display for LevelProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelProblem::Missing(level) => write!(f, "level {}: record missing", level),
            LevelProblem::Unreadable { level, reason } => {
                write!(f, "level {}: {}", level, reason)
            }
        }
    }
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Levels listed by the index, ascending.
    pub levels: Vec<LevelKey>,
    /// Records that decoded cleanly.
    pub readable: usize,
    /// Total vertices across readable records.
    pub vertices: usize,
    pub problems: Vec<LevelProblem>,
    /// Entries that are neither the index nor a listed level.
    pub stray_entries: Vec<String>,
}

impl ArchiveReport {
    /// Returns true if every indexed level decoded and nothing is stray.
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty() && self.stray_entries.is_empty()
    }
}

/// Check every record of an opened archive.
pub fn verify(reader: &mut dyn ArchiveReader) -> Result<ArchiveReport, ArchiveError> {
    let mut levels = reader.read_index()?;
    levels.sort();

    let listed: BTreeSet<String> = levels.iter().map(|k| k.record_name()).collect();
    let stray_entries = reader
        .entry_names()?
        .into_iter()
        .filter(|name| name != INDEX_RECORD_NAME && !listed.contains(name))
        .collect();

    let mut report = ArchiveReport {
        stray_entries,
        ..Default::default()
    };
    for &level in &levels {
        match reader.read_level(level) {
            Ok(Some(isoline)) => {
                report.readable += 1;
                report.vertices += isoline.vertex_count();
            }
            Ok(None) => report.problems.push(LevelProblem::Missing(level)),
            Err(e) if e.is_content_error() => report.problems.push(LevelProblem::Unreadable {
                level,
                reason: e.to_string(),
            }),
            Err(e) => return Err(e),
        }
    }
    report.levels = levels;

    tracing::info!(
        levels = report.levels.len(),
        readable = report.readable,
        problems = report.problems.len(),
        stray = report.stray_entries.len(),
        "Verified isoline archive"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format;
    use crate::archive::reader::RandomAccessReader;
    use crate::archive::{index, record};
    use crate::isoline::{Isoline, Path, Point};
    use std::io::Cursor;

    fn key(level: f64) -> LevelKey {
        LevelKey::from_level(level).unwrap()
    }

    fn isoline(level: f64) -> Isoline {
        Isoline::new("c", level, "EPSG:4326")
            .with_path(Path::open(vec![Point::new(0.0, level), Point::new(1.0, level)]))
    }

    /// Hand-assemble a container: index listing `indexed`, records for `records`.
    fn container(indexed: &[f64], records: &[(f64, Isoline)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        format::write_file_header(&mut bytes).unwrap();
        let keys: Vec<LevelKey> = indexed.iter().map(|&l| key(l)).collect();
        let (header, data) =
            format::stored_entry(INDEX_RECORD_NAME, index::encode_index(&keys).unwrap()).unwrap();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&data);
        for (filed_under, iso) in records {
            let payload = record::encode_record(iso).unwrap();
            let (header, data) =
                format::deflated_entry(&key(*filed_under).record_name(), &payload).unwrap();
            header.write_to(&mut bytes).unwrap();
            bytes.extend_from_slice(&data);
        }
        format::write_trailer(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_clean_archive() {
        let bytes = container(&[1.0, 2.0], &[(1.0, isoline(1.0)), (2.0, isoline(2.0))]);
        let mut reader = RandomAccessReader::new(Cursor::new(bytes)).unwrap();
        let report = verify(&mut reader).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.readable, 2);
        assert_eq!(report.vertices, 4);
        assert_eq!(report.levels, vec![key(1.0), key(2.0)]);
    }

    #[test]
    fn test_reports_missing_mismatched_and_stray() {
        let bytes = container(
            &[1.0, 2.0, 3.0],
            &[(1.0, isoline(1.0)), (2.0, isoline(9.0)), (4.0, isoline(4.0))],
        );
        let mut reader = RandomAccessReader::new(Cursor::new(bytes)).unwrap();
        let report = verify(&mut reader).unwrap();

        assert!(!report.is_clean());
        assert_eq!(report.readable, 1);
        assert_eq!(report.stray_entries, vec!["level/4"]);
        assert_eq!(report.problems.len(), 2);
        assert!(matches!(
            report.problems[0],
            LevelProblem::Unreadable { level, .. } if level == key(2.0)
        ));
        assert_eq!(report.problems[1], LevelProblem::Missing(key(3.0)));
        assert_eq!(report.problems[1].to_string(), "level 3: record missing");
    }
}
