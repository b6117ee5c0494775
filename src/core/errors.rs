//! Error type for the block-height liveness check.

use std::time::Duration;

use thiserror::Error;

/// Every way a single block-height check can fail before a height is observed.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Transport-level failure (DNS, connection refused, TLS, ...).
    #[error("RPC request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The full round trip exceeded the configured bound.
    #[error("RPC request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success HTTP status.
    #[error("RPC endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The node answered with a JSON-RPC error object instead of a result.
    #[error("RPC returned error: {0}")]
    Rpc(String),

    /// The response has neither `result` nor `error`.
    #[error("Response has no `result` field: {0}")]
    MissingResult(String),

    /// `result` is present but is not a hex quantity.
    #[error("Invalid hex quantity {value}: {reason}")]
    InvalidHex { value: String, reason: String },
}

/// Result type for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    /// True when the endpoint could not be reached or did not answer in time,
    /// as opposed to answering with something unusable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_))
    }

    pub(crate) fn invalid_hex(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHex { value: value.into(), reason: reason.into() }
    }
}
