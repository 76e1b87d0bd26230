//! In-memory runtime and fetcher doubles for unit tests

use super::discovery::AssetLocation;
use super::fetch::AssetFetcher;
use super::runtime::{ModelRuntime, Prediction};
use crate::error::{BridgeError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use tokio::sync::oneshot;

/// Serves fixed bytes per location; everything else is a 404
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
    started: Mutex<Option<oneshot::Sender<()>>>,
    gate: Option<Mutex<mpsc::Receiver<()>>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve(mut self, location: &str, bytes: &[u8]) -> Self {
        self.responses.insert(location.to_string(), bytes.to_vec());
        self
    }

    /// Block the first fetch until released; `started` fires when it begins
    pub(crate) fn gated(mut self) -> (Self, oneshot::Receiver<()>, mpsc::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        self.started = Mutex::new(Some(started_tx));
        self.gate = Some(Mutex::new(release_rx));
        (self, started_rx, release_tx)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl AssetFetcher for ScriptedFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>> {
        let key = location.to_string();
        self.calls.lock().push(key.clone());

        if let Some(started) = self.started.lock().take() {
            let _ = started.send(());
        }
        if let Some(gate) = &self.gate {
            let _ = gate.lock().recv();
        }

        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| BridgeError::fetch(format!("404 Not Found: {}", key)))
    }
}

/// Allocation and read counters shared by every [`StubTensor`]
#[derive(Debug, Default)]
pub(crate) struct TensorStats {
    allocated: AtomicUsize,
    live: AtomicUsize,
    predicts: AtomicUsize,
    inputs: Mutex<Vec<(Vec<usize>, Vec<i32>)>>,
    reads: Mutex<Vec<usize>>,
}

impl TensorStats {
    pub(crate) fn allocated(&self) -> usize {
        self.allocated.load(Ordering::SeqCst)
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn predicts(&self) -> usize {
        self.predicts.load(Ordering::SeqCst)
    }

    /// Shape and values of every input passed to `predict`, in order
    pub(crate) fn inputs(&self) -> Vec<(Vec<usize>, Vec<i32>)> {
        self.inputs.lock().clone()
    }

    /// Output indices passed to `read_output`
    pub(crate) fn reads(&self) -> Vec<usize> {
        self.reads.lock().clone()
    }
}

pub(crate) struct StubTensor {
    shape: Vec<usize>,
    ints: Vec<i32>,
    floats: Vec<f32>,
    output_index: usize,
    stats: Arc<TensorStats>,
}

impl StubTensor {
    fn allocate(
        stats: &Arc<TensorStats>,
        shape: Vec<usize>,
        ints: Vec<i32>,
        floats: Vec<f32>,
        output_index: usize,
    ) -> Self {
        stats.allocated.fetch_add(1, Ordering::SeqCst);
        stats.live.fetch_add(1, Ordering::SeqCst);
        Self {
            shape,
            ints,
            floats,
            output_index,
            stats: Arc::clone(stats),
        }
    }
}

impl Drop for StubTensor {
    fn drop(&mut self) {
        self.stats.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runtime whose outputs are `output_dim` copies of `output_index + 1`
pub(crate) struct StubRuntime {
    output_dim: usize,
    output_count: usize,
    fail_predict: bool,
    stats: Arc<TensorStats>,
}

impl StubRuntime {
    /// Artifact bytes the stub refuses to load
    pub(crate) const CORRUPT: &'static [u8] = b"corrupt";

    pub(crate) fn new(output_dim: usize) -> Self {
        Self {
            output_dim,
            output_count: 1,
            fail_predict: false,
            stats: Arc::new(TensorStats::default()),
        }
    }

    pub(crate) fn with_outputs(mut self, output_count: usize) -> Self {
        self.output_count = output_count;
        self
    }

    pub(crate) fn failing_predict(mut self) -> Self {
        self.fail_predict = true;
        self
    }

    pub(crate) fn stats(&self) -> Arc<TensorStats> {
        Arc::clone(&self.stats)
    }
}

impl ModelRuntime for StubRuntime {
    type Model = Vec<u8>;
    type Input = StubTensor;
    type Output = StubTensor;

    fn name(&self) -> &'static str {
        "stub"
    }

    fn load_model(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes == Self::CORRUPT {
            return Err(BridgeError::model("unrecognized model format"));
        }
        Ok(bytes.to_vec())
    }

    fn input_tensor(&self, values: &[i32], shape: [usize; 2]) -> Result<StubTensor> {
        Ok(StubTensor::allocate(
            &self.stats,
            shape.to_vec(),
            values.to_vec(),
            Vec::new(),
            0,
        ))
    }

    fn predict(
        &self,
        _model: &Vec<u8>,
        inputs: [&StubTensor; 3],
    ) -> Result<Prediction<StubTensor>> {
        self.stats.predicts.fetch_add(1, Ordering::SeqCst);
        self.stats
            .inputs
            .lock()
            .extend(inputs.iter().map(|t| (t.shape.clone(), t.ints.clone())));

        if self.fail_predict {
            return Err(BridgeError::inference("kernel failure"));
        }

        let mut outputs: Vec<StubTensor> = (0..self.output_count)
            .map(|index| {
                StubTensor::allocate(
                    &self.stats,
                    vec![1, self.output_dim],
                    Vec::new(),
                    vec![(index + 1) as f32; self.output_dim],
                    index,
                )
            })
            .collect();

        if outputs.len() == 1 {
            Ok(Prediction::Single(outputs.remove(0)))
        } else {
            Ok(Prediction::Many(outputs))
        }
    }

    fn read_output(&self, output: &StubTensor) -> Result<Vec<f32>> {
        self.stats.reads.lock().push(output.output_index);
        Ok(output.floats.clone())
    }
}
