//! ONNX Runtime backend

use super::runtime::{ModelRuntime, Prediction};
use super::tensor::HostTensor;
use crate::error::{BridgeError, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

/// [`ModelRuntime`] backed by ONNX Runtime
///
/// Input handles stay in host memory until `predict`, where they are copied
/// into ORT tensors that are released when the call returns. Outputs are
/// copied back into host tensors in declaration order.
#[derive(Debug, Clone)]
pub struct OnnxRuntime {
    intra_threads: usize,
}

impl OnnxRuntime {
    pub fn new(intra_threads: usize) -> Self {
        Self {
            intra_threads: intra_threads.max(1),
        }
    }
}

impl Default for OnnxRuntime {
    fn default() -> Self {
        Self::new(1)
    }
}

fn to_ort(tensor: &HostTensor<i32>) -> Result<Tensor<i32>> {
    Tensor::from_array(([1, tensor.data.len()], tensor.data.clone()))
        .map_err(|e| BridgeError::inference(format!("Failed to create input tensor: {}", e)))
}

impl ModelRuntime for OnnxRuntime {
    type Model = Session;
    type Input = HostTensor<i32>;
    type Output = HostTensor<f32>;

    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn load_model(&self, bytes: &[u8]) -> Result<Session> {
        let session = Session::builder()
            .map_err(|e| BridgeError::model(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| BridgeError::model(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(self.intra_threads)
            .map_err(|e| BridgeError::model(format!("Failed to set thread count: {}", e)))?
            .commit_from_memory(bytes)
            .map_err(|e| BridgeError::model(format!("Failed to load ONNX model: {}", e)))?;

        log::debug!(
            "ONNX session ready ({} inputs, {} outputs)",
            session.inputs.len(),
            session.outputs.len()
        );
        Ok(session)
    }

    fn input_tensor(&self, values: &[i32], shape: [usize; 2]) -> Result<HostTensor<i32>> {
        HostTensor::from_slice(values, &shape)
    }

    fn predict(
        &self,
        session: &Session,
        inputs: [&HostTensor<i32>; 3],
    ) -> Result<Prediction<HostTensor<f32>>> {
        let [ids, mask, types] = inputs;
        let (ids, mask, types) = (to_ort(ids)?, to_ort(mask)?, to_ort(types)?);
        let inputs = ort::inputs![ids, mask, types]
            .map_err(|e| BridgeError::inference(format!("Failed to create inputs: {}", e)))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| BridgeError::inference(format!("ONNX inference failed: {}", e)))?;

        let mut extracted = Vec::with_capacity(session.outputs.len());
        for (index, declared) in session.outputs.iter().enumerate() {
            match outputs[declared.name.as_str()].try_extract_tensor::<f32>() {
                Ok(view) => extracted.push(HostTensor {
                    shape: view.shape().to_vec(),
                    data: view.iter().copied().collect(),
                }),
                Err(e) if index == 0 => {
                    return Err(BridgeError::inference(format!(
                        "Failed to extract output '{}': {}",
                        declared.name, e
                    )));
                }
                Err(e) => log::debug!("Skipping non-f32 output '{}': {}", declared.name, e),
            }
        }

        if extracted.len() == 1 {
            Ok(Prediction::Single(extracted.remove(0)))
        } else {
            Ok(Prediction::Many(extracted))
        }
    }

    fn read_output(&self, output: &HostTensor<f32>) -> Result<Vec<f32>> {
        Ok(output.data.clone())
    }
}
