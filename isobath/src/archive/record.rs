//! Per-level record codec.
//!
//! A record payload is `format_version:u16` followed by the bincode form of
//! the [`Isoline`]. The payload carries the full-precision level, so the level
//! never has to be recovered from the (textual) record name.

use std::io;

use crate::isoline::{Isoline, LevelKey};

use super::error::ArchiveError;

/// Version tag written ahead of every record payload.
pub const RECORD_VERSION: u16 = 1;

/// Serialize an isoline into a record payload (before compression).
pub fn encode_record(isoline: &Isoline) -> Result<Vec<u8>, ArchiveError> {
    let body = bincode::serialize(isoline)
        .map_err(|e| io::Error::other(format!("Failed to serialize isoline: {}", e)))?;

    let mut payload = Vec::with_capacity(2 + body.len());
    payload.extend_from_slice(&RECORD_VERSION.to_be_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Deserialize a record payload filed under `expected`.
///
/// The decoded level, narrowed and normalized, must match the key the record
/// was fetched for; otherwise the record is inconsistent with the index.
pub fn decode_record(
    name: &str,
    payload: &[u8],
    expected: LevelKey,
) -> Result<Isoline, ArchiveError> {
    let decode_err = |reason: String| ArchiveError::Decode {
        name: name.to_string(),
        reason,
    };

    let (version, body) = payload
        .split_first_chunk::<2>()
        .map(|(v, body)| (u16::from_be_bytes(*v), body))
        .ok_or_else(|| decode_err("record too short".to_string()))?;
    if version != RECORD_VERSION {
        return Err(decode_err(format!("unsupported record version {}", version)));
    }

    let isoline: Isoline = bincode::deserialize(body).map_err(|e| decode_err(e.to_string()))?;

    if LevelKey::from_level(isoline.level) != Some(expected) {
        return Err(ArchiveError::LevelMismatch {
            name: name.to_string(),
            expected: expected.value(),
            found: isoline.level,
        });
    }

    Ok(isoline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isoline::{Path, Point};

    fn sample(level: f64) -> Isoline {
        Isoline::new("sample", level, "EPSG:4326").with_path(Path::open(vec![
            Point::new(-5.5, 47.25),
            Point::new(-5.25, 47.5),
        ]))
    }

    #[test]
    fn test_decode_restores_full_precision_level() {
        // 0.1 does not survive narrowing to f32, but the record keeps the f64
        let iso = sample(0.1);
        let key = LevelKey::from_level(0.1).unwrap();
        let payload = encode_record(&iso).unwrap();
        let decoded = decode_record(&key.record_name(), &payload, key).unwrap();
        assert_eq!(decoded.level, 0.1);
        assert_eq!(decoded, iso);
    }

    #[test]
    fn test_negative_zero_record_matches_zero_key() {
        let iso = sample(-0.0);
        let key = LevelKey::from_level(0.0).unwrap();
        let payload = encode_record(&iso).unwrap();
        assert!(decode_record("level/0", &payload, key).is_ok());
    }

    #[test]
    fn test_level_mismatch() {
        let payload = encode_record(&sample(30.0)).unwrap();
        let key = LevelKey::from_level(25.5).unwrap();
        let err = decode_record("level/25_5", &payload, key).unwrap_err();
        assert!(matches!(err, ArchiveError::LevelMismatch { found, .. } if found == 30.0));
        assert!(err.is_content_error());
    }

    #[test]
    fn test_bad_payloads_are_decode_errors() {
        let key = LevelKey::from_level(1.0).unwrap();

        let err = decode_record("level/1", &[0], key).unwrap_err();
        assert!(matches!(err, ArchiveError::Decode { .. }));

        let mut payload = encode_record(&sample(1.0)).unwrap();
        payload[1] = 99;
        let err = decode_record("level/1", &payload, key).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Decode { ref reason, .. } if reason.contains("version")
        ));

        let payload = encode_record(&sample(1.0)).unwrap();
        let err = decode_record("level/1", &payload[..payload.len() - 3], key).unwrap_err();
        assert!(matches!(err, ArchiveError::Decode { .. }));
    }
}
