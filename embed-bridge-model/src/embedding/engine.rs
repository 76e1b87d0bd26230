//! Inference adapter
//!
//! Marshals one tokenized sequence into three `[1, L]` integer tensors, runs a
//! single forward pass and returns the first output's flat data.

use super::loader::ModelLoader;
use super::runtime::ModelRuntime;
use super::tensor::TokenizedInput;
use crate::error::{BridgeError, Result};
use std::sync::Arc;

/// Runs forward passes against the model held by a [`ModelLoader`]
///
/// Calls may run concurrently; each allocates its own tensors and releases
/// them before returning, on success and on failure.
pub struct InferenceAdapter<R: ModelRuntime> {
    loader: Arc<ModelLoader<R>>,
    embedding_dim: Option<usize>,
}

impl<R: ModelRuntime> InferenceAdapter<R> {
    pub fn new(loader: Arc<ModelLoader<R>>) -> Self {
        Self {
            loader,
            embedding_dim: None,
        }
    }

    /// Reject outputs whose flat length differs from `dim`
    pub fn with_embedding_dim(mut self, dim: Option<usize>) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn embedding_dim(&self) -> Option<usize> {
        self.embedding_dim
    }

    /// Run one forward pass
    ///
    /// Fails with [`BridgeError::ModelNotLoaded`] before allocating anything
    /// when no model has been loaded.
    pub async fn infer(&self, input: TokenizedInput) -> Result<Vec<f32>> {
        let model = self.loader.model().ok_or(BridgeError::ModelNotLoaded)?;
        let runtime = Arc::clone(self.loader.runtime());

        let result = tokio::task::spawn_blocking(move || forward(&*runtime, &model, &input))
            .await
            .map_err(|e| BridgeError::inference(format!("Inference task failed: {}", e)))
            .and_then(|inner| inner)
            .and_then(|data| self.check_dim(data));

        if let Err(e) = &result {
            log::error!("Prediction error: {}", e);
        }
        result
    }

    fn check_dim(&self, data: Vec<f32>) -> Result<Vec<f32>> {
        match self.embedding_dim {
            Some(expected) if expected != data.len() => Err(BridgeError::OutputDimension {
                expected,
                actual: data.len(),
            }),
            _ => Ok(data),
        }
    }
}

fn forward<R: ModelRuntime>(
    runtime: &R,
    model: &R::Model,
    input: &TokenizedInput,
) -> Result<Vec<f32>> {
    input.validate()?;
    let shape = input.shape();

    // order is part of the model's input contract
    let ids = runtime.input_tensor(&input.input_ids, shape)?;
    let mask = runtime.input_tensor(&input.attention_mask, shape)?;
    let types = runtime.input_tensor(&input.token_type_ids, shape)?;

    let output = runtime
        .predict(model, [&ids, &mask, &types])?
        .into_first()
        .ok_or_else(|| BridgeError::inference("Model produced no outputs"))?;
    let data = runtime.read_output(&output)?;

    drop(output);
    drop(types);
    drop(mask);
    drop(ids);

    log::debug!("Forward pass produced {} values", data.len());
    Ok(data)
}
