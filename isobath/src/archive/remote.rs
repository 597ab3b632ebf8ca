//! Remote archives over HTTP.
//!
//! A remote container is only ever read as a forward-only stream. `GET`
//! answering 404 means "no container yet"; publication uploads the complete
//! container with a single `PUT`, so the server swaps it in whole.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::isoline::{Isoline, LevelKey};

use super::error::ArchiveError;
use super::reader::{ArchiveReader, ByteStream, SequentialReader};
use super::store::ArchiveStore;
use super::writer::ArchiveWriter;

/// Transport abstraction for remote archives.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling in-memory transports in tests.
pub trait RemoteTransport: Send + Sync {
    /// Open the resource for reading, or `None` if it does not exist.
    fn get(&self, url: &str) -> Result<Option<ByteStream>, ArchiveError>;

    /// Replace the resource with `body`.
    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), ArchiveError>;
}

/// Real transport implementation using reqwest.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with a 30 second timeout.
    pub fn new() -> Result<Self, ArchiveError> {
        Self::with_timeout(30)
    }

    /// Creates a new transport with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ArchiveError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ArchiveError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl RemoteTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<Option<ByteStream>, ArchiveError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ArchiveError::Http(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ArchiveError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        Ok(Some(Box::new(response)))
    }

    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), ArchiveError> {
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .map_err(|e| ArchiveError::Http(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ArchiveError::Http(format!(
                "HTTP {} uploading to {}",
                response.status(),
                url
            )));
        }
        Ok(())
    }
}

/// An archive published at a URL.
pub struct RemoteStore<T> {
    url: String,
    transport: Arc<T>,
}

impl<T: RemoteTransport + 'static> RemoteStore<T> {
    pub fn new(url: impl Into<String>, transport: T) -> Self {
        Self {
            url: url.into(),
            transport: Arc::new(transport),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<T: RemoteTransport + 'static> ArchiveStore for RemoteStore<T> {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn open(&self) -> Result<Option<Box<dyn ArchiveReader>>, ArchiveError> {
        let Some(stream) = self.transport.get(&self.url)? else {
            return Ok(None);
        };

        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let opener = move || -> Result<ByteStream, ArchiveError> {
            transport
                .get(&url)?
                .ok_or_else(|| ArchiveError::Http(format!("archive disappeared from {}", url)))
        };

        let reader = SequentialReader::from_stream(stream, Box::new(opener))?;
        Ok(Some(Box::new(reader)))
    }

    fn publish(&self, population: &BTreeMap<LevelKey, Isoline>) -> Result<(), ArchiveError> {
        let body = ArchiveWriter::new(Vec::new()).write_archive(population)?;
        let size = body.len();
        self.transport.put(&self.url, body)?;

        tracing::info!(
            url = %self.url,
            levels = population.len(),
            bytes = size,
            "Uploaded isoline archive"
        );
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::archive::AccessMode;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::io::Cursor;

    /// In-memory transport for testing
    #[derive(Default)]
    pub struct MockTransport {
        pub resources: Mutex<HashMap<String, Vec<u8>>>,
        pub fail_puts: bool,
    }

    impl RemoteTransport for MockTransport {
        fn get(&self, url: &str) -> Result<Option<ByteStream>, ArchiveError> {
            Ok(self
                .resources
                .lock()
                .get(url)
                .map(|bytes| Box::new(Cursor::new(bytes.clone())) as ByteStream))
        }

        fn put(&self, url: &str, body: Vec<u8>) -> Result<(), ArchiveError> {
            if self.fail_puts {
                return Err(ArchiveError::Http("HTTP 503 uploading".to_string()));
            }
            self.resources.lock().insert(url.to_string(), body);
            Ok(())
        }
    }

    fn population(levels: &[f64]) -> BTreeMap<LevelKey, Isoline> {
        levels
            .iter()
            .map(|&l| (LevelKey::from_level(l).unwrap(), Isoline::new("c", l, "EPSG:3857")))
            .collect()
    }

    #[test]
    fn test_missing_remote_archive_is_none() {
        let store = RemoteStore::new("http://example.com/isolines.isoz", MockTransport::default());
        assert!(store.open().unwrap().is_none());
    }

    #[test]
    fn test_publish_then_open_is_sequential() {
        let store = RemoteStore::new("http://example.com/isolines.isoz", MockTransport::default());
        store.publish(&population(&[-10.0, 0.0, 25.5])).unwrap();

        let mut reader = store.open().unwrap().unwrap();
        assert_eq!(reader.access(), AccessMode::SequentialOnly);
        assert_eq!(reader.read_index().unwrap().len(), 3);

        // Out-of-order lookups reopen through the transport
        let high = LevelKey::from_level(25.5).unwrap();
        let low = LevelKey::from_level(-10.0).unwrap();
        assert_eq!(reader.read_level(high).unwrap().unwrap().level, 25.5);
        assert_eq!(reader.read_level(low).unwrap().unwrap().level, -10.0);
    }

    #[test]
    fn test_failed_upload_propagates() {
        let transport = MockTransport {
            fail_puts: true,
            ..Default::default()
        };
        let store = RemoteStore::new("http://example.com/a.isoz", transport);
        let err = store.publish(&population(&[1.0])).unwrap_err();
        assert!(matches!(err, ArchiveError::Http(_)));
        assert!(store.open().unwrap().is_none());
    }

    #[test]
    fn test_describe_is_url() {
        let store = RemoteStore::new("http://example.com/a.isoz", MockTransport::default());
        assert_eq!(store.describe(), "http://example.com/a.isoz");
        assert_eq!(store.url(), "http://example.com/a.isoz");
    }
}
