use clap::Parser;
use std::path::PathBuf;

/// Status checker daemon (library-facing definitions)
#[derive(Debug, Parser)]
#[command(
    name = "status-checker",
    about = "Runs check programs on an interval and exports their outcomes to Prometheus",
    version
)]
pub struct Cli {
    /// TOML config file; defaults to /etc/status-checker/config.toml, then ./config.toml
    pub config: Option<PathBuf>,
}
