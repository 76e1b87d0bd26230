//! Error types for the bridge server.

use crate::rpc::protocol::{JsonRpcError, MODEL_NOT_LOADED};
use embed_bridge_model::BridgeError;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),
}

impl From<ServerError> for JsonRpcError {
    fn from(err: ServerError) -> Self {
        let message = err.to_string();
        match err {
            ServerError::Bridge(BridgeError::ModelNotLoaded) => {
                JsonRpcError::new(MODEL_NOT_LOADED, message)
            }
            ServerError::Bridge(BridgeError::ShapeMismatch { .. })
            | ServerError::InvalidParams(_) => JsonRpcError::invalid_params(message),
            ServerError::Bridge(_) => JsonRpcError::internal_error(message),
            ServerError::InvalidRequest(_) => JsonRpcError::invalid_request(message),
            ServerError::MethodNotFound(method) => JsonRpcError::method_not_found(method),
        }
    }
}

/// Result type alias for request handlers.
pub type ServerResult<T> = Result<T, ServerError>;
