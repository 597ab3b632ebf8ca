//! Archive readers.
//!
//! Two access strategies share one [`ArchiveReader`] contract:
//!
//! - [`RandomAccessReader`] scans the entry headers once, then seeks straight
//!   to any record by name.
//! - [`SequentialReader`] works on forward-only streams (HTTP bodies, pipes).
//!   The index must be the first entry. Lookups scan forward; a lookup that
//!   runs off the end reopens the stream and scans the part it skipped.
//!
//! Callers that request levels in archive order (ascending) therefore read a
//! forward-only container in a single pass.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::isoline::{Isoline, LevelKey, INDEX_RECORD_NAME};

use super::error::ArchiveError;
use super::format::{self, EntryHeader};
use super::{index, record, AccessMode};

/// Read access to an opened archive.
pub trait ArchiveReader: Send {
    /// The access strategy backing this reader.
    fn access(&self) -> AccessMode;

    /// Read and verify the payload of the named entry.
    ///
    /// Returns `Ok(None)` if no entry has that name.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError>;

    /// Names of all entries, in container order.
    fn entry_names(&mut self) -> Result<Vec<String>, ArchiveError>;

    /// Read the index record.
    fn read_index(&mut self) -> Result<Vec<LevelKey>, ArchiveError> {
        let payload = self
            .read_entry(INDEX_RECORD_NAME)?
            .ok_or(ArchiveError::MissingIndex)?;
        index::decode_index(&payload)
    }

    /// Read the isoline filed under `key`.
    ///
    /// Returns `Ok(None)` if the archive has no record for the level.
    fn read_level(&mut self, key: LevelKey) -> Result<Option<Isoline>, ArchiveError> {
        let name = key.record_name();
        match self.read_entry(&name)? {
            Some(payload) => record::decode_record(&name, &payload, key).map(Some),
            None => Ok(None),
        }
    }
}

/// Location of an entry inside a seekable container.
#[derive(Debug, Clone)]
struct Located {
    header: EntryHeader,
    data_offset: u64,
}

/// Reader for seekable containers such as local files.
pub struct RandomAccessReader<R> {
    inner: R,
    entries: HashMap<String, Located>,
    order: Vec<String>,
}

impl RandomAccessReader<BufReader<File>> {
    /// Open a local archive file.
    pub fn open_file(path: &std::path::Path) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> RandomAccessReader<R> {
    /// Scan all entry headers of the container.
    pub fn new(mut inner: R) -> Result<Self, ArchiveError> {
        format::read_file_header(&mut inner)?;

        let mut entries = HashMap::new();
        let mut order = Vec::new();
        while let Some(header) = EntryHeader::read_from(&mut inner)? {
            let data_offset = inner.stream_position()?;
            inner.seek(SeekFrom::Current(header.data_len as i64))?;
            let name = header.name.clone();
            if entries
                .insert(name.clone(), Located { header, data_offset })
                .is_some()
            {
                return Err(ArchiveError::Corrupt(format!("duplicate entry '{}'", name)));
            }
            order.push(name);
        }

        // The trailer sits past every entry's data, so no entry is truncated
        tracing::debug!(entries = order.len(), "Scanned archive directory");

        Ok(Self {
            inner,
            entries,
            order,
        })
    }

    /// Number of entries in the container.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the container has no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<R: Read + Seek + Send> ArchiveReader for RandomAccessReader<R> {
    fn access(&self) -> AccessMode {
        AccessMode::RandomAccess
    }

    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        let Some(located) = self.entries.get(name) else {
            return Ok(None);
        };
        self.inner.seek(SeekFrom::Start(located.data_offset))?;
        let data = format::read_data(&mut self.inner, located.header.data_len)?;
        located.header.decode_payload(data).map(Some)
    }

    fn entry_names(&mut self) -> Result<Vec<String>, ArchiveError> {
        Ok(self.order.clone())
    }
}

/// Boxed forward-only byte stream.
pub type ByteStream = Box<dyn Read + Send>;

/// Opens a fresh forward-only stream over the same container.
pub trait StreamOpener: Send {
    fn open(&self) -> Result<ByteStream, ArchiveError>;
}

impl<F> StreamOpener for F
where
    F: Fn() -> Result<ByteStream, ArchiveError> + Send,
{
    fn open(&self) -> Result<ByteStream, ArchiveError> {
        self()
    }
}

/// Opens a local file as a forward-only stream.
#[derive(Debug, Clone)]
pub struct FileOpener {
    path: PathBuf,
}

impl FileOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StreamOpener for FileOpener {
    fn open(&self) -> Result<ByteStream, ArchiveError> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }
}

/// Reader for forward-only containers.
pub struct SequentialReader {
    opener: Box<dyn StreamOpener>,
    stream: BufReader<ByteStream>,
    index: Vec<u8>,
    /// Level entries consumed since the stream was (re)opened.
    position: usize,
    /// The trailer has been reached.
    exhausted: bool,
    reopens: usize,
}

impl SequentialReader {
    /// Open a stream through `opener`.
    pub fn open(opener: Box<dyn StreamOpener>) -> Result<Self, ArchiveError> {
        let stream = opener.open()?;
        Self::from_stream(stream, opener)
    }

    /// Use an already opened stream; `opener` is used for later reopens.
    pub fn from_stream(
        stream: ByteStream,
        opener: Box<dyn StreamOpener>,
    ) -> Result<Self, ArchiveError> {
        let mut stream = BufReader::new(stream);
        let index = Self::read_leading_index(&mut stream)?;
        Ok(Self {
            opener,
            stream,
            index,
            position: 0,
            exhausted: false,
            reopens: 0,
        })
    }

    /// How many times the stream had to be reopened.
    pub fn reopen_count(&self) -> usize {
        self.reopens
    }

    fn read_leading_index(stream: &mut BufReader<ByteStream>) -> Result<Vec<u8>, ArchiveError> {
        format::read_file_header(stream)?;
        let header = EntryHeader::read_from(stream)?.ok_or(ArchiveError::MissingIndex)?;
        if header.name != INDEX_RECORD_NAME {
            return Err(ArchiveError::MissingIndex);
        }
        let data = format::read_data(stream, header.data_len)?;
        header.decode_payload(data)
    }

    fn reopen(&mut self) -> Result<(), ArchiveError> {
        let mut stream = BufReader::new(self.opener.open()?);
        // Re-verify: the container may have been replaced underneath us
        let index = Self::read_leading_index(&mut stream)?;
        if index != self.index {
            return Err(ArchiveError::Corrupt(
                "archive index changed while reading".to_string(),
            ));
        }
        self.stream = stream;
        self.position = 0;
        self.exhausted = false;
        self.reopens += 1;
        tracing::debug!(reopens = self.reopens, "Reopened sequential archive stream");
        Ok(())
    }

    /// Scan forward for `name`, giving up at the trailer or after `limit` entries.
    fn scan(&mut self, name: &str, limit: Option<usize>) -> Result<Option<Vec<u8>>, ArchiveError> {
        while limit.map_or(true, |limit| self.position < limit) {
            let Some(header) = EntryHeader::read_from(&mut self.stream)? else {
                self.exhausted = true;
                return Ok(None);
            };
            self.position += 1;
            if header.name == name {
                let data = format::read_data(&mut self.stream, header.data_len)?;
                return header.decode_payload(data).map(Some);
            }
            format::skip_data(&mut self.stream, header.data_len)?;
        }
        Ok(None)
    }
}

impl ArchiveReader for SequentialReader {
    fn access(&self) -> AccessMode {
        AccessMode::SequentialOnly
    }

    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        if name == INDEX_RECORD_NAME {
            return Ok(Some(self.index.clone()));
        }
        if self.exhausted {
            self.reopen()?;
        }

        let start = self.position;
        if let Some(payload) = self.scan(name, None)? {
            return Ok(Some(payload));
        }
        if start == 0 {
            return Ok(None);
        }

        // The entry may lie behind where this scan started
        self.reopen()?;
        self.scan(name, Some(start))
    }

    fn entry_names(&mut self) -> Result<Vec<String>, ArchiveError> {
        self.reopen()?;
        let mut names = vec![INDEX_RECORD_NAME.to_string()];
        while let Some(header) = EntryHeader::read_from(&mut self.stream)? {
            format::skip_data(&mut self.stream, header.data_len)?;
            names.push(header.name);
        }
        self.exhausted = true;
        Ok(names)
    }
}
