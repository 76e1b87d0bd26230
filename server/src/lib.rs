//! Embed Bridge Server Library
//!
//! Hosts the sentence-embedding bridge behind a line-delimited JSON-RPC 2.0
//! interface with two entry points, `loadEmbeddingModel` and `vectorizeText`.

pub mod error;
pub mod rpc;

pub use error::ServerError;
pub use rpc::BridgeServer;
