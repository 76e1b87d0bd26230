//! Line-delimited JSON-RPC transport
//!
//! One JSON object per line. Generic over the byte streams so the server can
//! run on stdio or on in-memory buffers.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// A non-empty input line
#[derive(Debug)]
pub enum Incoming {
    Request(JsonRpcRequest),
    /// Line that is not valid UTF-8 JSON; carries the parse error
    Malformed(String),
    /// Valid JSON that is not a request; carries its id when one is present
    Invalid { id: Option<Value>, message: String },
}

/// Reads requests line by line
pub struct RequestReader<I> {
    input: I,
    line: Vec<u8>,
}

impl<I: AsyncBufRead + Unpin> RequestReader<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            line: Vec::new(),
        }
    }

    /// Next request, skipping blank lines; `None` at EOF
    ///
    /// Only I/O failures are errors. Undecodable lines come back as
    /// [`Incoming::Malformed`] so the caller can answer and keep reading.
    pub async fn next(&mut self) -> io::Result<Option<Incoming>> {
        loop {
            self.line.clear();
            if self.input.read_until(b'\n', &mut self.line).await? == 0 {
                return Ok(None);
            }

            let text = match std::str::from_utf8(&self.line) {
                Ok(text) => text.trim(),
                Err(e) => {
                    tracing::error!("Request line is not valid UTF-8: {}", e);
                    return Ok(Some(Incoming::Malformed(e.to_string())));
                }
            };
            if text.is_empty() {
                continue;
            }

            return Ok(Some(classify(text)));
        }
    }
}

fn classify(text: &str) -> Incoming {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to parse JSON-RPC request: {}", e);
            return Incoming::Malformed(e.to_string());
        }
    };

    let id = value.get("id").filter(|id| !id.is_null()).cloned();
    match serde_json::from_value(value) {
        Ok(request) => Incoming::Request(request),
        Err(e) => {
            tracing::error!("Invalid JSON-RPC request: {}", e);
            Incoming::Invalid {
                id,
                message: e.to_string(),
            }
        }
    }
}

/// Writes one response per line, flushing after each
pub struct ResponseWriter<O> {
    output: O,
}

impl<O: AsyncWrite + Unpin> ResponseWriter<O> {
    pub fn new(output: O) -> Self {
        Self { output }
    }

    pub async fn write(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)?;
        self.output.write_all(json.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    pub fn into_inner(self) -> O {
        self.output
    }
}
