//! JSON-RPC 2.0 message types and bridge method params

use embed_bridge_model::LoadState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METHOD_LOAD: &str = "loadEmbeddingModel";
pub const METHOD_VECTORIZE: &str = "vectorizeText";
pub const METHOD_STATUS: &str = "status";
pub const METHOD_PING: &str = "ping";

/// Server-defined error code for inference before a successful load
pub const MODEL_NOT_LOADED: i32 = -32001;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(-32700, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(-32600, message)
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(-32601, format!("Method not found: {}", method.into()))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(-32602, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(-32603, message)
    }
}

/// `vectorizeText` params by name
///
/// Token values arrive as JSON numbers of any representation and are
/// truncated to 32-bit integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorizeTextParams {
    pub input_ids: Vec<f64>,
    pub attention_mask: Vec<f64>,
    pub token_type_ids: Vec<f64>,
    pub sequence_length: usize,
}

impl VectorizeTextParams {
    pub fn to_i32(values: &[f64]) -> Vec<i32> {
        values.iter().map(|v| *v as i32).collect()
    }
}

/// `vectorizeText` params by name or by position
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VectorizeTextArgs {
    Named(VectorizeTextParams),
    Positional(Vec<f64>, Vec<f64>, Vec<f64>, usize),
}

impl From<VectorizeTextArgs> for VectorizeTextParams {
    fn from(args: VectorizeTextArgs) -> Self {
        match args {
            VectorizeTextArgs::Named(params) => params,
            VectorizeTextArgs::Positional(
                input_ids,
                attention_mask,
                token_type_ids,
                sequence_length,
            ) => Self {
                input_ids,
                attention_mask,
                token_type_ids,
                sequence_length,
            },
        }
    }
}

/// `status` result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub state: LoadState,
    pub model_file: String,
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_dim: Option<usize>,
}

/// Ping response
#[derive(Debug, Clone, Serialize)]
pub struct PingResult {}
