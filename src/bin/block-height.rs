//! Block-height liveness check.
//!
//! Asks the public Polygon RPC node for `eth_blockNumber` once and prints
//! `block_number: <n>`. Exits 0 when the height is positive, 1 when it is
//! zero and 2 when the node could not be queried or answered garbage.
use std::io;
use std::process::ExitCode;

use status_checker::checks::block_height;
use status_checker::logging::init_check_logging;
use status_checker::network::{DEFAULT_RPC_URL, DEFAULT_TIMEOUT};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_check_logging() {
        eprintln!("failed to initialize logging: {e}");
    }

    let code = block_height::run(DEFAULT_RPC_URL, DEFAULT_TIMEOUT, &mut io::stdout()).await;
    ExitCode::from(code)
}
