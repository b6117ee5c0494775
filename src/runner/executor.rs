//! Runs a single check program.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Runs the program at `path` with the inherited environment, logging each
/// line it prints. Returns whether it exited successfully.
pub async fn run_check(path: &Path, check: &str) -> bool {
    let mut child = match Command::new(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!(check, "Failed to start command: {}", e);
            return false;
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    tokio::join!(log_output(stdout, check), log_output(stderr, check));

    match child.wait().await {
        Ok(status) if status.success() => true,
        Ok(status) => {
            error!(check, %status, "Check failed");
            false
        }
        Err(e) => {
            error!(check, "Failed to wait for command: {}", e);
            false
        }
    }
}

async fn log_output<R>(stream: Option<R>, check: &str)
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else { return };
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => debug!(check, "{}", line.trim()),
            Ok(None) => break,
            Err(e) => {
                warn!(check, "Failed to read output: {}", e);
                break;
            }
        }
    }
}
