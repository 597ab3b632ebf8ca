//! Container framing.
//!
//! ```text
//! header  : magic "ISOBATH\0", version:u16
//! entry*  : name_len:u16 (>0), name, method:u8,
//!           stored  (0): size:u32, sha256:[u8; 32], data
//!           deflate (8): compressed:u32, uncompressed:u32, data
//! trailer : name_len:u16 = 0
//! ```
//!
//! All integers are big-endian. Stored entries carry their exact size and a
//! digest so they can be read without inflating anything; deflate entries
//! are zlib streams written at maximum compression.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};

use super::error::ArchiveError;

/// Leading bytes of every container.
pub const MAGIC: &[u8; 8] = b"ISOBATH\0";

/// Current container format version.
pub const FORMAT_VERSION: u16 = 1;

const METHOD_STORED: u8 = 0;
const METHOD_DEFLATE: u8 = 8;

/// How an entry's payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Raw payload with a SHA-256 digest.
    Stored { digest: [u8; 32] },
    /// Zlib stream that inflates to `uncompressed` bytes.
    Deflate { uncompressed: u32 },
}

/// Header preceding each entry's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub name: String,
    pub method: Method,
    /// Number of data bytes following the header.
    pub data_len: u32,
}

impl EntryHeader {
    /// Read the next entry header, or `None` at the trailer.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>, ArchiveError> {
        let name_len = read_u16(reader).map_err(|e| truncated(e, "archive (missing trailer)"))?;
        if name_len == 0 {
            return Ok(None);
        }

        let mut name = vec![0u8; name_len as usize];
        reader
            .read_exact(&mut name)
            .map_err(|e| truncated(e, "entry name"))?;
        let name = String::from_utf8(name)
            .map_err(|_| ArchiveError::Corrupt("entry name is not UTF-8".to_string()))?;

        let method = read_u8(reader).map_err(|e| truncated(e, "entry header"))?;
        let (method, data_len) = match method {
            METHOD_STORED => {
                let size = read_u32(reader).map_err(|e| truncated(e, "entry header"))?;
                let mut digest = [0u8; 32];
                reader
                    .read_exact(&mut digest)
                    .map_err(|e| truncated(e, "entry header"))?;
                (Method::Stored { digest }, size)
            }
            METHOD_DEFLATE => {
                let compressed = read_u32(reader).map_err(|e| truncated(e, "entry header"))?;
                let uncompressed = read_u32(reader).map_err(|e| truncated(e, "entry header"))?;
                (Method::Deflate { uncompressed }, compressed)
            }
            other => {
                return Err(ArchiveError::Corrupt(format!(
                    "unknown method {} for entry '{}'",
                    other, name
                )))
            }
        };

        Ok(Some(Self {
            name,
            method,
            data_len,
        }))
    }

    /// Write this header.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ArchiveError> {
        let name = self.name.as_bytes();
        if name.is_empty() || name.len() > u16::MAX as usize {
            return Err(ArchiveError::Corrupt(format!(
                "invalid entry name length {}",
                name.len()
            )));
        }
        writer.write_all(&(name.len() as u16).to_be_bytes())?;
        writer.write_all(name)?;
        match self.method {
            Method::Stored { digest } => {
                writer.write_all(&[METHOD_STORED])?;
                writer.write_all(&self.data_len.to_be_bytes())?;
                writer.write_all(&digest)?;
            }
            Method::Deflate { uncompressed } => {
                writer.write_all(&[METHOD_DEFLATE])?;
                writer.write_all(&self.data_len.to_be_bytes())?;
                writer.write_all(&uncompressed.to_be_bytes())?;
            }
        }
        Ok(())
    }

    /// Turn this entry's raw data into its payload, verifying it on the way.
    pub fn decode_payload(&self, data: Vec<u8>) -> Result<Vec<u8>, ArchiveError> {
        match self.method {
            Method::Stored { digest } => {
                if data.len() != self.data_len as usize || sha256(&data) != digest {
                    return Err(ArchiveError::ChecksumMismatch {
                        name: self.name.clone(),
                    });
                }
                Ok(data)
            }
            Method::Deflate { uncompressed } => {
                let mut payload = Vec::with_capacity(uncompressed as usize);
                // One extra byte so an oversized stream is detected, not truncated
                ZlibDecoder::new(data.as_slice())
                    .take(uncompressed as u64 + 1)
                    .read_to_end(&mut payload)
                    .map_err(|e| ArchiveError::Decode {
                        name: self.name.clone(),
                        reason: e.to_string(),
                    })?;
                if payload.len() != uncompressed as usize {
                    return Err(ArchiveError::Decode {
                        name: self.name.clone(),
                        reason: format!(
                            "inflated to {} bytes, expected {}",
                            payload.len(),
                            uncompressed
                        ),
                    });
                }
                Ok(payload)
            }
        }
    }
}

/// Build a stored entry for `payload`.
pub fn stored_entry(name: &str, payload: Vec<u8>) -> Result<(EntryHeader, Vec<u8>), ArchiveError> {
    let data_len = entry_len(name, payload.len())?;
    let header = EntryHeader {
        name: name.to_string(),
        method: Method::Stored {
            digest: sha256(&payload),
        },
        data_len,
    };
    Ok((header, payload))
}

/// Build a deflate entry for `payload` at maximum compression.
pub fn deflated_entry(name: &str, payload: &[u8]) -> Result<(EntryHeader, Vec<u8>), ArchiveError> {
    let uncompressed = entry_len(name, payload.len())?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(payload)?;
    let data = encoder.finish()?;
    let header = EntryHeader {
        name: name.to_string(),
        method: Method::Deflate { uncompressed },
        data_len: entry_len(name, data.len())?,
    };
    Ok((header, data))
}

/// Write the container header.
pub fn write_file_header<W: Write>(writer: &mut W) -> Result<(), ArchiveError> {
    writer.write_all(MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_be_bytes())?;
    Ok(())
}

/// Read and validate the container header.
pub fn read_file_header<R: Read>(reader: &mut R) -> Result<(), ArchiveError> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ArchiveError::BadMagic,
        _ => ArchiveError::Io(e),
    })?;
    if &magic != MAGIC {
        return Err(ArchiveError::BadMagic);
    }
    let version = read_u16(reader).map_err(|e| truncated(e, "archive header"))?;
    if version != FORMAT_VERSION {
        return Err(ArchiveError::UnsupportedVersion(version));
    }
    Ok(())
}

/// Write the end-of-container marker.
pub fn write_trailer<W: Write>(writer: &mut W) -> Result<(), ArchiveError> {
    writer.write_all(&0u16.to_be_bytes())?;
    Ok(())
}

/// Read exactly `len` data bytes of the current entry.
pub fn read_data<R: Read>(reader: &mut R, len: u32) -> Result<Vec<u8>, ArchiveError> {
    let mut data = vec![0u8; len as usize];
    reader
        .read_exact(&mut data)
        .map_err(|e| truncated(e, "entry data"))?;
    Ok(data)
}

/// Skip `len` data bytes of the current entry on a forward-only stream.
pub fn skip_data<R: Read>(reader: &mut R, len: u32) -> Result<(), ArchiveError> {
    let skipped = io::copy(&mut reader.take(len as u64), &mut io::sink())?;
    if skipped != len as u64 {
        return Err(ArchiveError::Corrupt("truncated entry data".to_string()));
    }
    Ok(())
}

/// SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

fn entry_len(name: &str, size: usize) -> Result<u32, ArchiveError> {
    u32::try_from(size).map_err(|_| ArchiveError::EntryTooLarge {
        name: name.to_string(),
        size,
    })
}

fn truncated(err: io::Error, what: &str) -> ArchiveError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ArchiveError::Corrupt(format!("truncated {}", what))
    } else {
        ArchiveError::Io(err)
    }
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}
