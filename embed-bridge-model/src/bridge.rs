//! Host-facing entry points
//!
//! `load_embedding_model` never fails: every problem collapses into `false`.
//! `vectorize_text` surfaces errors to the caller unchanged.

use crate::config::BridgeConfig;
use crate::embedding::{
    AssetFetcher, AssetLocator, InferenceAdapter, LoadOutcome, LoadState, ModelLoader,
    ModelRuntime, TokenizedInput,
};
use crate::error::Result;
use std::sync::Arc;

#[cfg(feature = "onnx")]
use crate::embedding::{DefaultFetcher, OnnxRuntime};

/// Model loader and inference adapter behind the two host entry points
pub struct EmbeddingBridge<R: ModelRuntime> {
    loader: Arc<ModelLoader<R>>,
    adapter: InferenceAdapter<R>,
}

impl<R: ModelRuntime> EmbeddingBridge<R> {
    /// Create a bridge over `runtime`, fetching artifacts with `fetcher`
    pub fn new(runtime: R, fetcher: Arc<dyn AssetFetcher>, config: &BridgeConfig) -> Self {
        let loader = Arc::new(ModelLoader::new(
            Arc::new(runtime),
            fetcher,
            config.locator(),
        ));
        let adapter =
            InferenceAdapter::new(Arc::clone(&loader)).with_embedding_dim(config.embedding_dim);
        Self { loader, adapter }
    }

    /// Load the model; `true` if it is loaded when the call returns
    pub async fn load_embedding_model(&self) -> bool {
        self.load().await.is_success()
    }

    /// Load the model and report exactly what happened
    pub async fn load(&self) -> LoadOutcome {
        self.loader.load().await
    }

    /// Embed one tokenized sequence
    pub async fn vectorize_text(
        &self,
        input_ids: Vec<i32>,
        attention_mask: Vec<i32>,
        token_type_ids: Vec<i32>,
        sequence_length: usize,
    ) -> Result<Vec<f32>> {
        self.adapter
            .infer(TokenizedInput::new(
                input_ids,
                attention_mask,
                token_type_ids,
                sequence_length,
            ))
            .await
    }

    pub fn state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn locator(&self) -> &AssetLocator {
        self.loader.locator()
    }

    pub fn embedding_dim(&self) -> Option<usize> {
        self.adapter.embedding_dim()
    }
}

#[cfg(feature = "onnx")]
impl EmbeddingBridge<OnnxRuntime> {
    /// ONNX Runtime bridge fetching over HTTP or from disk
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            OnnxRuntime::new(config.intra_threads),
            Arc::new(DefaultFetcher::new()),
            config,
        )
    }
}
