//! Bridge server implementation
//!
//! Routes JSON-RPC requests to the embedding bridge. Each request runs in its
//! own task; responses funnel through one writer task in completion order.

use super::protocol::*;
use super::transport::{Incoming, RequestReader, ResponseWriter};
use crate::error::{ServerError, ServerResult};
use embed_bridge_model::{EmbeddingBridge, ModelRuntime};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Bridge server - exposes `loadEmbeddingModel` and `vectorizeText`
pub struct BridgeServer<R: ModelRuntime> {
    bridge: EmbeddingBridge<R>,
}

impl<R: ModelRuntime> BridgeServer<R> {
    pub fn new(bridge: EmbeddingBridge<R>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &EmbeddingBridge<R> {
        &self.bridge
    }

    /// Serve requests from `input` until EOF, returning `output` once every
    /// in-flight request has been answered
    pub async fn serve<I, O>(self: Arc<Self>, input: I, output: O) -> io::Result<O>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin + Send + 'static,
    {
        let mut reader = RequestReader::new(input);
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer = tokio::spawn(async move {
            let mut writer = ResponseWriter::new(output);
            while let Some(response) = rx.recv().await {
                writer.write(&response).await?;
            }
            Ok::<_, io::Error>(writer.into_inner())
        });

        tracing::info!("Bridge server starting...");

        let mut handlers = JoinSet::new();
        let read_result = loop {
            let incoming = match reader.next().await {
                Ok(Some(incoming)) => incoming,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            match incoming {
                Incoming::Request(request) => {
                    let server = Arc::clone(&self);
                    let tx = tx.clone();
                    handlers.spawn(async move {
                        if let Some(response) = server.handle_request(request).await {
                            let _ = tx.send(response);
                        }
                    });
                }
                Incoming::Malformed(message) => {
                    let _ = tx.send(JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", message)),
                    ));
                }
                Incoming::Invalid { id, message } => {
                    let _ = tx.send(JsonRpcResponse::error(
                        id,
                        ServerError::InvalidRequest(message).into(),
                    ));
                }
            }
        };

        match &read_result {
            Ok(()) => tracing::info!("Client disconnected"),
            Err(e) => tracing::error!("Failed to read request: {}", e),
        }

        // answer everything already received before surfacing a read error
        while handlers.join_next().await.is_some() {}
        drop(tx);

        let output = writer.await.map_err(io::Error::other)??;
        read_result.map(|()| output)
    }

    /// Handle one request; notifications produce no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!("Handling request: {}", request.method);
        let notification = request.is_notification();

        let result = if request.jsonrpc != "2.0" {
            Err(ServerError::InvalidRequest(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )))
        } else {
            self.dispatch(&request.method, request.params).await
        };

        if notification {
            return None;
        }

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, e.into()),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> ServerResult<Value> {
        match method {
            METHOD_LOAD => Ok(self.handle_load(params).await),
            METHOD_VECTORIZE => self.handle_vectorize(params).await,
            METHOD_STATUS => self.handle_status(),
            METHOD_PING => to_value(PingResult {}),
            _ => Err(ServerError::MethodNotFound(method.to_string())),
        }
    }

    async fn handle_load(&self, params: Option<Value>) -> Value {
        if params.is_some() {
            tracing::debug!("Ignoring modelBytes; model is fetched from the deployment base");
        }
        Value::Bool(self.bridge.load_embedding_model().await)
    }

    async fn handle_vectorize(&self, params: Option<Value>) -> ServerResult<Value> {
        let args: VectorizeTextArgs = match params {
            Some(p) => serde_json::from_value(p)
                .map_err(|e| ServerError::InvalidParams(e.to_string()))?,
            None => return Err(ServerError::InvalidParams("Missing params".to_string())),
        };
        let params = VectorizeTextParams::from(args);

        let embedding = self
            .bridge
            .vectorize_text(
                VectorizeTextParams::to_i32(&params.input_ids),
                VectorizeTextParams::to_i32(&params.attention_mask),
                VectorizeTextParams::to_i32(&params.token_type_ids),
                params.sequence_length,
            )
            .await?;

        to_value(embedding)
    }

    fn handle_status(&self) -> ServerResult<Value> {
        let locator = self.bridge.locator();
        to_value(StatusResult {
            state: self.bridge.state(),
            model_file: locator.model_file().to_string(),
            candidates: locator
                .candidates()
                .iter()
                .map(|location| location.to_string())
                .collect(),
            embedding_dim: self.bridge.embedding_dim(),
        })
    }
}

fn to_value<T: serde::Serialize>(value: T) -> ServerResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ServerError::Bridge(embed_bridge_model::BridgeError::Json(e)))
}
