//! Embedding model loading and inference
//!
//! The runtime behind [`ModelRuntime`] owns the model format and kernels;
//! this module locates the artifact, guards the load, and sequences a single
//! forward pass.

mod discovery;
mod engine;
mod fetch;
mod loader;
#[cfg(feature = "onnx")]
mod onnx;
mod runtime;
mod tensor;
#[cfg(test)]
pub(crate) mod testing;

pub use discovery::{AssetBase, AssetLocation, AssetLocator, DEFAULT_MODEL_FILE};
pub use engine::InferenceAdapter;
pub use fetch::{AssetFetcher, DefaultFetcher};
pub use loader::{LoadOutcome, LoadState, ModelLoader};
#[cfg(feature = "onnx")]
pub use onnx::OnnxRuntime;
pub use runtime::{ModelRuntime, Prediction};
pub use tensor::{HostTensor, TokenizedInput};
