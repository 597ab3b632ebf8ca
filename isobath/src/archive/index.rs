//! Index record codec.
//!
//! Layout: `count:i32` followed by `count` big-endian `f32` levels. The record
//! is always stored uncompressed with its digest (see [`super::format`]), so
//! the level list is available without inflating any per-level record.

use crate::isoline::{LevelKey, INDEX_RECORD_NAME};

use super::error::ArchiveError;

/// Encode the level list. Keys are written in the order given.
pub fn encode_index(keys: &[LevelKey]) -> Result<Vec<u8>, ArchiveError> {
    let count = i32::try_from(keys.len()).map_err(|_| ArchiveError::EntryTooLarge {
        name: INDEX_RECORD_NAME.to_string(),
        size: keys.len(),
    })?;

    let mut buf = Vec::with_capacity(4 + keys.len() * 4);
    buf.extend_from_slice(&count.to_be_bytes());
    for key in keys {
        buf.extend_from_slice(&key.value().to_be_bytes());
    }
    Ok(buf)
}

/// Decode the level list.
///
/// A count that disagrees with the number of levels present is reported as
/// [`ArchiveError::IndexCountMismatch`]; it is never silently truncated.
pub fn decode_index(payload: &[u8]) -> Result<Vec<LevelKey>, ArchiveError> {
    let (count, body) = match payload.split_first_chunk::<4>() {
        Some((count, body)) => (i32::from_be_bytes(*count), body),
        None => return Err(ArchiveError::Corrupt("index record too short".to_string())),
    };
    if count < 0 {
        return Err(ArchiveError::Corrupt(format!(
            "index declares negative level count {}",
            count
        )));
    }
    if body.len() % 4 != 0 {
        return Err(ArchiveError::Corrupt(format!(
            "index body of {} bytes is not a whole number of levels",
            body.len()
        )));
    }

    let keys = body
        .chunks_exact(4)
        .map(|chunk| {
            let value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            LevelKey::from_f32(value)
                .ok_or_else(|| ArchiveError::Corrupt("index contains NaN level".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if keys.len() != count as usize {
        return Err(ArchiveError::IndexCountMismatch {
            declared: count,
            actual: keys.len(),
        });
    }

    Ok(keys)
}
