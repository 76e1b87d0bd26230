//! Error types for embed-bridge-model

use thiserror::Error;

/// Errors that can occur while loading or running the embedding model
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Inference requested before any successful load
    #[error("Model is not loaded.")]
    ModelNotLoaded,

    /// Model construction error (runtime rejected the artifact)
    #[error("Model error: {0}")]
    Model(String),

    /// Artifact fetch error (HTTP status, transport or file read)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// An input sequence does not match the requested shape
    #[error("Shape mismatch: {name} has {actual} values, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Model output does not have the configured embedding dimension
    #[error("Output dimension mismatch: expected {expected}, got {actual}")]
    OutputDimension { expected: usize, actual: usize },

    /// Forward pass or output extraction error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
