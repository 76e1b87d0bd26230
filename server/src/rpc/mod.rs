//! JSON-RPC host interface
//!
//! Exposes the embedding bridge to a host process over stdio.
//!
//! ## Usage
//!
//! ```bash
//! embed-bridge --base https://example.com/app/ --embedding-dim 384
//! ```
//!
//! Requests and responses are JSON-RPC 2.0 objects, one per line.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::*;
pub use server::BridgeServer;
