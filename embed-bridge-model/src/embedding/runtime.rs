//! Inference runtime seam
//!
//! The model format, tensor memory and kernels all belong to the runtime.
//! This crate only sequences calls through [`ModelRuntime`].

use crate::error::Result;

/// Result of a forward pass
///
/// Single-output models yield `Single`; multi-output models yield every
/// output in declaration order.
#[derive(Debug)]
pub enum Prediction<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> Prediction<T> {
    /// Keep the first output, releasing the rest
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Single(output) => Some(output),
            Self::Many(outputs) => outputs.into_iter().next(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(outputs) => outputs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ML runtime able to load a model and run it on integer inputs
///
/// Tensor handles own their runtime resources and release them on `Drop`.
pub trait ModelRuntime: Send + Sync + 'static {
    /// Loaded model handle, shared across concurrent inference calls
    type Model: Send + Sync + 'static;
    /// Input tensor handle
    type Input: Send + 'static;
    /// Output tensor handle
    type Output: Send + 'static;

    /// Runtime name for logs
    fn name(&self) -> &'static str;

    /// Build a model from its serialized artifact
    fn load_model(&self, bytes: &[u8]) -> Result<Self::Model>;

    /// Allocate a 32-bit integer tensor
    fn input_tensor(&self, values: &[i32], shape: [usize; 2]) -> Result<Self::Input>;

    /// Run one forward pass; inputs are ordered ids, mask, types
    fn predict(&self, model: &Self::Model, inputs: [&Self::Input; 3])
        -> Result<Prediction<Self::Output>>;

    /// Copy out an output tensor's flat data
    fn read_output(&self, output: &Self::Output) -> Result<Vec<f32>>;
}
