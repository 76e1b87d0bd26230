//! Artifact fetching
//!
//! Reads the model bytes from a URL or a local file. Fetching is blocking;
//! the loader runs it on the tokio blocking pool.

use super::discovery::AssetLocation;
use crate::error::{BridgeError, Result};
use std::io::Read;

/// Source of model artifact bytes
pub trait AssetFetcher: Send + Sync + 'static {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>>;
}

/// HTTP via `ureq` for URLs, `std::fs` for files
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher;

impl DefaultFetcher {
    pub fn new() -> Self {
        Self
    }

    fn fetch_url(url: &str) -> Result<Vec<u8>> {
        // ureq reports 4xx/5xx as Error::Status
        let response = ureq::get(url)
            .call()
            .map_err(|e| BridgeError::fetch(format!("GET {}: {}", url, e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| BridgeError::fetch(format!("Failed to read body of {}: {}", url, e)))?;

        let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
        log::debug!("Fetched {} ({:.1} MB)", url, size_mb);
        Ok(bytes)
    }
}

impl AssetFetcher for DefaultFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>> {
        match location {
            AssetLocation::Url(url) => Self::fetch_url(url),
            AssetLocation::File(path) => std::fs::read(path)
                .map_err(|e| BridgeError::fetch(format!("{}: {}", path.display(), e))),
        }
    }
}
