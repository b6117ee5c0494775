//! src/checks/block_height.rs
//!
//! Liveness check for a JSON-RPC node: fetch the block height once, report it
//! and turn it into a process exit code.

use std::io::Write;
use std::time::Duration;

use tracing::{error, info};

use crate::core::errors::Result;
use crate::core::BlockHeight;
use crate::network::RpcClient;

/// Exit code when a positive height was observed.
pub const HEALTHY_EXIT_CODE: u8 = 0;
/// Exit code when the node answered with a height of zero.
pub const NOT_PROGRESSING_EXIT_CODE: u8 = 1;
/// Exit code for every failure that happens before a height is observed.
pub const FAULT_EXIT_CODE: u8 = 2;

/// The height a check observed and the verdict derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub height: BlockHeight,
}

impl CheckOutcome {
    pub fn new(height: BlockHeight) -> Self {
        Self { height }
    }

    pub fn is_healthy(&self) -> bool {
        self.height.is_positive()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_healthy() {
            HEALTHY_EXIT_CODE
        } else {
            NOT_PROGRESSING_EXIT_CODE
        }
    }

    /// The single line written to stdout.
    pub fn report_line(&self) -> String {
        format!("block_number: {}", self.height)
    }
}

/// Performs exactly one `eth_blockNumber` call against `rpc_url`.
pub async fn check_block_height(rpc_url: &str, timeout: Duration) -> Result<CheckOutcome> {
    let client = RpcClient::new(rpc_url, timeout)?;
    let height = client.block_number().await?;
    Ok(CheckOutcome::new(height))
}

/// Runs the check, writes the report line to `out` and returns the exit code.
///
/// Nothing is written to `out` when the check faults.
pub async fn run<W: Write>(rpc_url: &str, timeout: Duration, out: &mut W) -> u8 {
    let outcome = match check_block_height(rpc_url, timeout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(url = rpc_url, unreachable = e.is_unreachable(), "Block height check failed: {}", e);
            return FAULT_EXIT_CODE;
        }
    };

    if let Err(e) = writeln!(out, "{}", outcome.report_line()).and_then(|_| out.flush()) {
        error!("Failed to write block height report: {}", e);
        return FAULT_EXIT_CODE;
    }

    info!(height = %outcome.height, healthy = outcome.is_healthy(), "Block height check finished");
    outcome.exit_code()
}
