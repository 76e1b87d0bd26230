//! Embed Bridge Server Entry Point
//!
//! Serves `loadEmbeddingModel` / `vectorizeText` as JSON-RPC 2.0 over stdio.
//! Logs go to stderr; stdout carries the protocol.

use anyhow::Context;
use clap::Parser;
use embed_bridge_model::{BridgeConfig, EmbeddingBridge};
use embed_bridge_server::BridgeServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "embed_bridge_server=info,embed_bridge_model=info";

#[derive(Parser)]
#[command(name = "embed-bridge")]
#[command(about = "Sentence-embedding model bridge over JSON-RPC stdio")]
#[command(version)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Deployment base: http(s) URL or directory containing assets/
    #[arg(long)]
    base: Option<String>,

    /// Page origin, e.g. https://host; with --pathname, replaces --base
    #[arg(long)]
    origin: Option<String>,

    /// Page path joined to --origin
    #[arg(long, requires = "origin")]
    pathname: Option<String>,

    /// Model artifact file name
    #[arg(long)]
    model_file: Option<String>,

    /// Expected embedding length
    #[arg(long)]
    embedding_dim: Option<usize>,

    /// Intra-op threads for the inference session
    #[arg(long)]
    intra_threads: Option<usize>,

    /// Load the model before serving requests
    #[arg(long)]
    preload: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BridgeConfig::default(),
        };

        if let Some(base) = self.base {
            config.base = base;
        }
        if self.origin.is_some() {
            config.origin = self.origin;
            config.pathname = self.pathname;
        }
        if let Some(model_file) = self.model_file {
            config.model_file = model_file;
        }
        if self.embedding_dim.is_some() {
            config.embedding_dim = self.embedding_dim;
        }
        if let Some(threads) = self.intra_threads {
            config.intra_threads = threads;
        }

        config.validate()?;
        Ok(config)
    }
}

/// The default ONNX runtime cannot parse TFLite flatbuffers
fn tflite_with_onnx(config: &BridgeConfig) -> bool {
    config.model_file.to_ascii_lowercase().ends_with(".tflite")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let preload = args.preload;
    let config = args.into_config()?;

    tracing::info!("Starting embed-bridge");
    tracing::info!(
        "Base: {:?}, model file: {}",
        config.asset_base(),
        config.model_file
    );
    if tflite_with_onnx(&config) {
        tracing::warn!(
            "Model file {} looks like a TFLite artifact but the runtime is ONNX; \
             loading will fail unless --model-file names an ONNX model",
            config.model_file
        );
    }

    let server = Arc::new(BridgeServer::new(EmbeddingBridge::from_config(&config)));

    if preload && !server.bridge().load_embedding_model().await {
        tracing::warn!("Preload failed; the host may retry with loadEmbeddingModel");
    }

    server
        .serve(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await
        .context("Bridge server error")?;

    Ok(())
}
