use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::core::errors::{CheckError, Result};
use crate::core::BlockHeight;

/// Public Polygon JSON-RPC endpoint queried by the block-height check.
pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com/";

/// Bound on the full request/response round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response excerpt carried in error messages.
const MAX_BODY_EXCERPT: usize = 256;

/// Body of the `eth_blockNumber` JSON-RPC 2.0 call.
pub fn block_number_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "eth_blockNumber",
        "params": [],
        "id": 1
    })
}

pub struct RpcClient {
    client: Client,
    rpc_url: String,
    timeout: Duration,
}

impl RpcClient {
    /// Create a client pointing at a given RPC URL. `timeout` bounds each call.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, rpc_url: rpc_url.trim().to_string(), timeout })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON-RPC payload and return its `result` member.
    pub async fn call(&self, payload: &Value) -> Result<Value> {
        debug!(url = %self.rpc_url, method = %payload["method"], "sending JSON-RPC request");

        let resp = self
            .client
            .post(&self.rpc_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(CheckError::Status { status: status.as_u16(), body: excerpt(&text) });
        }

        let mut body: Value = serde_json::from_str(&text)?;
        if let Some(result) = body.get_mut("result").map(Value::take) {
            return Ok(result);
        }
        match body.get("error") {
            Some(err) => Err(CheckError::Rpc(err.to_string())),
            None => Err(CheckError::MissingResult(excerpt(&text))),
        }
    }

    /// Query the node's current block height via `eth_blockNumber`.
    pub async fn block_number(&self) -> Result<BlockHeight> {
        let result = self.call(&block_number_request()).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| CheckError::invalid_hex(result.to_string(), "expected a hex string"))?;
        let height = BlockHeight::from_hex(raw)?;
        debug!(raw, %height, "decoded block number");
        Ok(height)
    }

    fn transport_error(&self, err: reqwest::Error) -> CheckError {
        if err.is_timeout() {
            CheckError::Timeout(self.timeout)
        } else {
            CheckError::Http(err)
        }
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
