//! Model artifact discovery
//!
//! Builds the candidate locations for the model artifact relative to the
//! deployment base, in attempt order.

use std::fmt;
use std::path::PathBuf;

/// Default artifact name for the quantized MiniLM sentence encoder
pub const DEFAULT_MODEL_FILE: &str = "all-MiniLM-L6-v2-quant.tflite";

/// Where the deployment's assets are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetBase {
    /// HTTP(S) prefix, always ending in `/`
    Url(String),
    /// Local directory
    Dir(PathBuf),
}

impl AssetBase {
    /// Parse a base string: `http://` and `https://` prefixes are URLs,
    /// anything else is a directory.
    pub fn parse(base: &str) -> Self {
        let base = base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            Self::url(base)
        } else {
            Self::Dir(PathBuf::from(base))
        }
    }

    /// URL base; a trailing `/` is added when missing
    pub fn url(prefix: &str) -> Self {
        let mut prefix = prefix.to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self::Url(prefix)
    }

    /// Page origin plus page path, e.g. `https://host` + `/app/`
    pub fn from_origin_and_path(origin: &str, pathname: &str) -> Self {
        Self::url(&format!("{}{}", origin.trim_end_matches('/'), pathname))
    }

    fn resolve(&self, segments: &[&str]) -> AssetLocation {
        match self {
            Self::Url(prefix) => AssetLocation::Url(format!("{}{}", prefix, segments.join("/"))),
            Self::Dir(dir) => {
                let mut path = dir.clone();
                path.extend(segments);
                AssetLocation::File(path)
            }
        }
    }
}

/// A single concrete artifact location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves the primary and fallback artifact locations
///
/// Bundled web assets end up under a doubled `assets/assets/` segment, which
/// is tried first; the single-segment `assets/` layout is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    base: AssetBase,
    model_file: String,
}

impl AssetLocator {
    pub fn new(base: AssetBase, model_file: impl Into<String>) -> Self {
        Self {
            base,
            model_file: model_file.into(),
        }
    }

    pub fn base(&self) -> &AssetBase {
        &self.base
    }

    pub fn model_file(&self) -> &str {
        &self.model_file
    }

    /// `<base>assets/assets/<file>`
    pub fn primary(&self) -> AssetLocation {
        self.base.resolve(&["assets", "assets", self.model_file.as_str()])
    }

    /// `<base>assets/<file>`
    pub fn fallback(&self) -> AssetLocation {
        self.base.resolve(&["assets", self.model_file.as_str()])
    }

    /// Both locations in attempt order
    pub fn candidates(&self) -> [AssetLocation; 2] {
        [self.primary(), self.fallback()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_url_candidates() {
        let locator = AssetLocator::new(
            AssetBase::from_origin_and_path("https://example.com", "/app/"),
            DEFAULT_MODEL_FILE,
        );
        let [primary, fallback] = locator.candidates();
        assert_eq!(
            primary,
            AssetLocation::Url(
                "https://example.com/app/assets/assets/all-MiniLM-L6-v2-quant.tflite".to_string()
            )
        );
        assert_eq!(
            fallback,
            AssetLocation::Url(
                "https://example.com/app/assets/all-MiniLM-L6-v2-quant.tflite".to_string()
            )
        );
    }

    #[test]
    fn test_url_base_gets_trailing_slash() {
        assert_eq!(
            AssetBase::parse("http://localhost:8080"),
            AssetBase::Url("http://localhost:8080/".to_string())
        );
    }

    #[test]
    fn test_dir_candidates() {
        let locator = AssetLocator::new(AssetBase::parse("/srv/web"), "model.onnx");
        assert_eq!(
            locator.primary(),
            AssetLocation::File(Path::new("/srv/web/assets/assets/model.onnx").to_path_buf())
        );
        assert_eq!(
            locator.fallback(),
            AssetLocation::File(Path::new("/srv/web/assets/model.onnx").to_path_buf())
        );
    }

    #[test]
    fn test_location_display() {
        let loc = AssetLocation::Url("http://h/assets/m".to_string());
        assert_eq!(loc.to_string(), "http://h/assets/m");
    }
}
