//! Embed Bridge Model Layer
//!
//! Loads a pre-trained sentence-embedding model through an external ML
//! runtime and runs single-sequence inference on already-tokenized input.
//!
//! ## Features
//!
//! - **Fallback loading** - tries `assets/assets/<file>` then `assets/<file>`
//!   under the deployment base (URL or directory)
//! - **Busy guard** - at most one load in flight; concurrent requests are rejected
//! - **Scoped tensors** - every tensor is released on every exit path
//! - **ONNX Runtime backend** - behind the default `onnx` feature
//!
//! ## Example
//!
//! ```ignore
//! use embed_bridge_model::{BridgeConfig, EmbeddingBridge};
//!
//! let config = BridgeConfig {
//!     base: "https://example.com/app/".to_string(),
//!     ..Default::default()
//! };
//! let bridge = EmbeddingBridge::from_config(&config);
//!
//! if bridge.load_embedding_model().await {
//!     let embedding = bridge
//!         .vectorize_text(vec![101, 2054, 102], vec![1, 1, 1], vec![0, 0, 0], 3)
//!         .await?;
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod embedding;
pub mod error;

// Re-exports for convenience
pub use bridge::EmbeddingBridge;
pub use config::BridgeConfig;
pub use embedding::{
    AssetBase, AssetFetcher, AssetLocation, AssetLocator, DefaultFetcher, InferenceAdapter,
    LoadOutcome, LoadState, ModelLoader, ModelRuntime, Prediction, TokenizedInput,
    DEFAULT_MODEL_FILE,
};
#[cfg(feature = "onnx")]
pub use embedding::OnnxRuntime;
pub use error::{BridgeError, Result};
