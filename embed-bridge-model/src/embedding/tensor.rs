//! Tokenized input and host-side tensor buffers

use crate::error::{BridgeError, Result};

/// One tokenized sequence, batch size 1
///
/// Produced by the host's tokenizer; the three sequences share one length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedInput {
    pub input_ids: Vec<i32>,
    pub attention_mask: Vec<i32>,
    pub token_type_ids: Vec<i32>,
    pub sequence_length: usize,
}

impl TokenizedInput {
    pub fn new(
        input_ids: Vec<i32>,
        attention_mask: Vec<i32>,
        token_type_ids: Vec<i32>,
        sequence_length: usize,
    ) -> Self {
        Self {
            input_ids,
            attention_mask,
            token_type_ids,
            sequence_length,
        }
    }

    /// Shape shared by all three input tensors
    pub fn shape(&self) -> [usize; 2] {
        [1, self.sequence_length]
    }

    /// Check every sequence against `sequence_length`
    pub fn validate(&self) -> Result<()> {
        for (name, values) in self.named() {
            if values.len() != self.sequence_length {
                return Err(BridgeError::ShapeMismatch {
                    name,
                    expected: self.sequence_length,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Sequences in model input order: ids, mask, types
    pub fn named(&self) -> [(&'static str, &[i32]); 3] {
        [
            ("input_ids", self.input_ids.as_slice()),
            ("attention_mask", self.attention_mask.as_slice()),
            ("token_type_ids", self.token_type_ids.as_slice()),
        ]
    }
}

/// Owned, shaped tensor data living in host memory
#[derive(Debug, Clone, PartialEq)]
pub struct HostTensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: Clone> HostTensor<T> {
    /// Copy `values` into a new tensor, checking the element count
    pub fn from_slice(values: &[T], shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(BridgeError::inference(format!(
                "Tensor of shape {:?} needs {} values, got {}",
                shape,
                expected,
                values.len()
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data: values.to_vec(),
        })
    }
}
