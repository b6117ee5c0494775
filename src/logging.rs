//! Tracing subscriber setup shared by both binaries. All output goes to stderr
//! so stdout stays reserved for check reports.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LogsConfig;

/// Filter used by the `block-height` binary unless `RUST_LOG` says otherwise.
pub const CHECK_DEFAULT_FILTER: &str = "warn";

/// `RUST_LOG` when set, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Daemon logging: JSON lines unless `pretty` is set.
pub fn init_logging(logs: &LogsConfig) -> Result<()> {
    let filter = env_filter(&logs.level);

    if logs.pretty {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Logging for one-shot check programs.
pub fn init_check_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(CHECK_DEFAULT_FILTER))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
