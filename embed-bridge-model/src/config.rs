//! Bridge configuration

use crate::embedding::{AssetBase, AssetLocator, DEFAULT_MODEL_FILE};
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the embedding bridge
///
/// Every field has a default, so a JSON config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deployment base: an `http(s)://` URL or a local directory
    pub base: String,
    /// Page origin, e.g. `https://host`; when set, replaces `base` with
    /// `origin + pathname`
    pub origin: Option<String>,
    /// Page path joined to `origin` (default: `/`)
    pub pathname: Option<String>,
    /// Model artifact file name under `assets/`
    pub model_file: String,
    /// Expected embedding length; unchecked when `None`
    pub embedding_dim: Option<usize>,
    /// Intra-op threads for the runtime session (default: 1)
    pub intra_threads: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base: ".".to_string(),
            origin: None,
            pathname: None,
            model_file: DEFAULT_MODEL_FILE.to_string(),
            embedding_dim: None,
            intra_threads: 1,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a usable locator or session
    pub fn validate(&self) -> Result<()> {
        if self.base.trim().is_empty() {
            return Err(BridgeError::config("base must not be empty"));
        }
        if let Some(origin) = &self.origin {
            if !matches!(AssetBase::parse(origin), AssetBase::Url(_)) {
                return Err(BridgeError::config(format!(
                    "origin must be an http(s) URL, got '{}'",
                    origin
                )));
            }
        }
        if self.model_file.trim().is_empty() {
            return Err(BridgeError::config("model_file must not be empty"));
        }
        if self.embedding_dim == Some(0) {
            return Err(BridgeError::config("embedding_dim must be positive"));
        }
        if self.intra_threads == 0 {
            return Err(BridgeError::config("intra_threads must be positive"));
        }
        Ok(())
    }

    /// Resolved deployment base
    pub fn asset_base(&self) -> AssetBase {
        match &self.origin {
            Some(origin) => {
                AssetBase::from_origin_and_path(origin, self.pathname.as_deref().unwrap_or("/"))
            }
            None => AssetBase::parse(&self.base),
        }
    }

    /// Build the artifact locator for this configuration
    pub fn locator(&self) -> AssetLocator {
        AssetLocator::new(self.asset_base(), self.model_file.clone())
    }
}
