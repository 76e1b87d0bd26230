//! Model loader with primary/fallback locations and a busy guard
//!
//! At most one load is in flight. The `Loading` state is entered inside a
//! short critical section before the first `.await`, and is left on every
//! exit path (including a dropped future) through [`LoadingGuard`].

use super::discovery::{AssetLocation, AssetLocator};
use super::fetch::AssetFetcher;
use super::runtime::ModelRuntime;
use crate::error::{BridgeError, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Externally visible loader lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// What a single `load()` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This call loaded the model
    Loaded,
    /// A previous call had already loaded the model; nothing was fetched
    AlreadyLoaded,
    /// Another load is in flight; nothing was fetched
    Busy,
    /// Both locations failed
    Failed,
}

impl LoadOutcome {
    /// Boolean contract of the host boundary
    pub fn is_success(self) -> bool {
        matches!(self, Self::Loaded | Self::AlreadyLoaded)
    }
}

enum Slot<M> {
    Unloaded,
    Loading,
    Loaded(Arc<M>),
}

/// Loads the model once and holds it for the loader's lifetime
pub struct ModelLoader<R: ModelRuntime> {
    runtime: Arc<R>,
    fetcher: Arc<dyn AssetFetcher>,
    locator: AssetLocator,
    slot: Mutex<Slot<R::Model>>,
}

impl<R: ModelRuntime> ModelLoader<R> {
    pub fn new(runtime: Arc<R>, fetcher: Arc<dyn AssetFetcher>, locator: AssetLocator) -> Self {
        Self {
            runtime,
            fetcher,
            locator,
            slot: Mutex::new(Slot::Unloaded),
        }
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    pub fn locator(&self) -> &AssetLocator {
        &self.locator
    }

    pub fn state(&self) -> LoadState {
        match *self.slot.lock() {
            Slot::Unloaded => LoadState::Unloaded,
            Slot::Loading => LoadState::Loading,
            Slot::Loaded(_) => LoadState::Loaded,
        }
    }

    /// Shared handle to the loaded model, if any
    pub fn model(&self) -> Option<Arc<R::Model>> {
        match &*self.slot.lock() {
            Slot::Loaded(model) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    /// Load the model, trying the primary then the fallback location
    ///
    /// Never fails: errors are logged and reported as [`LoadOutcome::Failed`].
    pub async fn load(&self) -> LoadOutcome {
        {
            let mut slot = self.slot.lock();
            match &*slot {
                Slot::Loaded(_) => return LoadOutcome::AlreadyLoaded,
                Slot::Loading => {
                    log::debug!("Model load already in progress");
                    return LoadOutcome::Busy;
                }
                Slot::Unloaded => {}
            }
            *slot = Slot::Loading;
        }
        let guard = LoadingGuard {
            slot: &self.slot,
            completed: false,
        };

        let primary = self.locator.primary();
        log::info!("Trying model path: {}", primary);
        match self.load_from(primary.clone()).await {
            Ok(model) => {
                guard.complete(model);
                log::info!("Model loaded from {} ({})", primary, self.runtime.name());
                return LoadOutcome::Loaded;
            }
            Err(e) => log::warn!("Model path {} failed: {}", primary, e),
        }

        let fallback = self.locator.fallback();
        log::info!("Trying fallback model path: {}", fallback);
        match self.load_from(fallback.clone()).await {
            Ok(model) => {
                guard.complete(model);
                log::info!(
                    "Model loaded from fallback {} ({})",
                    fallback,
                    self.runtime.name()
                );
                LoadOutcome::Loaded
            }
            Err(e) => {
                drop(guard);
                log::error!("All model load attempts failed; last error: {}", e);
                LoadOutcome::Failed
            }
        }
    }

    async fn load_from(&self, location: AssetLocation) -> Result<R::Model> {
        let runtime = Arc::clone(&self.runtime);
        let fetcher = Arc::clone(&self.fetcher);

        tokio::task::spawn_blocking(move || {
            let bytes = fetcher.fetch(&location)?;
            runtime.load_model(&bytes)
        })
        .await
        .map_err(|e| BridgeError::model(format!("Load task failed: {}", e)))?
    }
}

/// Leaves the `Loading` state on drop unless a model was stored
struct LoadingGuard<'a, M> {
    slot: &'a Mutex<Slot<M>>,
    completed: bool,
}

impl<M> LoadingGuard<'_, M> {
    fn complete(mut self, model: M) {
        *self.slot.lock() = Slot::Loaded(Arc::new(model));
        self.completed = true;
    }
}

impl<M> Drop for LoadingGuard<'_, M> {
    fn drop(&mut self) {
        if !self.completed {
            *self.slot.lock() = Slot::Unloaded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::discovery::AssetBase;
    use crate::embedding::testing::{ScriptedFetcher, StubRuntime};
    use std::time::Duration;

    const BASE: &str = "http://localhost:8080/app/";
    const PRIMARY: &str = "http://localhost:8080/app/assets/assets/all-MiniLM-L6-v2-quant.tflite";
    const FALLBACK: &str = "http://localhost:8080/app/assets/all-MiniLM-L6-v2-quant.tflite";

    fn loader(fetcher: Arc<ScriptedFetcher>) -> ModelLoader<StubRuntime> {
        ModelLoader::new(
            Arc::new(StubRuntime::new(384)),
            fetcher,
            AssetLocator::new(AssetBase::parse(BASE), "all-MiniLM-L6-v2-quant.tflite"),
        )
    }

    #[tokio::test]
    async fn test_primary_success() {
        let fetcher = Arc::new(ScriptedFetcher::new().serve(PRIMARY, b"model"));
        let loader = loader(Arc::clone(&fetcher));

        assert_eq!(loader.load().await, LoadOutcome::Loaded);
        assert_eq!(loader.state(), LoadState::Loaded);
        assert!(loader.model().is_some());
        assert_eq!(fetcher.calls(), vec![PRIMARY.to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_after_primary_404() {
        let fetcher = Arc::new(ScriptedFetcher::new().serve(FALLBACK, b"model"));
        let loader = loader(Arc::clone(&fetcher));

        let outcome = loader.load().await;
        assert!(outcome.is_success());
        assert_eq!(loader.state(), LoadState::Loaded);
        assert!(loader.model().is_some());
        assert_eq!(
            fetcher.calls(),
            vec![PRIMARY.to_string(), FALLBACK.to_string()]
        );
    }

    #[tokio::test]
    async fn test_both_paths_fail() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let loader = loader(Arc::clone(&fetcher));

        assert_eq!(loader.load().await, LoadOutcome::Failed);
        assert_eq!(loader.state(), LoadState::Unloaded);
        assert!(loader.model().is_none());
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_runtime_rejects_artifact_then_fallback() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .serve(PRIMARY, StubRuntime::CORRUPT)
                .serve(FALLBACK, b"model"),
        );
        let loader = loader(Arc::clone(&fetcher));

        assert_eq!(loader.load().await, LoadOutcome::Loaded);
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_already_loaded_skips_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::new().serve(PRIMARY, b"model"));
        let loader = loader(Arc::clone(&fetcher));

        assert_eq!(loader.load().await, LoadOutcome::Loaded);
        let first = loader.model().unwrap();

        assert_eq!(loader.load().await, LoadOutcome::AlreadyLoaded);
        assert_eq!(fetcher.calls().len(), 1);
        assert!(Arc::ptr_eq(&first, &loader.model().unwrap()));
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let loader = loader(Arc::clone(&fetcher));
        assert_eq!(loader.load().await, LoadOutcome::Failed);
        assert_eq!(loader.load().await, LoadOutcome::Failed);
        assert_eq!(fetcher.calls().len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_load_is_busy() {
        let (fetcher, started, release) = ScriptedFetcher::new().serve(PRIMARY, b"model").gated();
        let fetcher = Arc::new(fetcher);
        let loader = Arc::new(loader(Arc::clone(&fetcher)));

        let first = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load().await }
        });

        started.await.unwrap();
        assert_eq!(loader.state(), LoadState::Loading);

        assert_eq!(loader.load().await, LoadOutcome::Busy);
        assert_eq!(fetcher.calls().len(), 1);

        release.send(()).unwrap();
        assert_eq!(first.await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(loader.state(), LoadState::Loaded);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropped_load_clears_loading_state() {
        let (fetcher, started, release) = ScriptedFetcher::new().serve(PRIMARY, b"model").gated();
        let loader = Arc::new(loader(Arc::new(fetcher)));

        let task = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load().await }
        });
        started.await.unwrap();
        task.abort();
        let _ = task.await;

        assert_eq!(loader.state(), LoadState::Unloaded);

        // unblock the orphaned fetch so the blocking pool can shut down
        release.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(loader.model().is_none());
    }
}
