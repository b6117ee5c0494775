// src/main.rs
//! Status checker entry point.
//! Loads config, starts the Prometheus exporter and runs every discovered check.
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;
use status_checker::cli::Cli;
use status_checker::config::Config;
use status_checker::logging::init_logging;
use status_checker::ops::{server::serve_metrics, StatusMetrics};
use status_checker::runner::run_status_checker;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = Config::locate(cli.config.as_deref());
    let config = Config::load(source.as_deref()).context("Failed to load config")?;

    init_logging(&config.logs)?;
    match &source {
        Some(path) => info!(path = %path.display(), "Loaded config file"),
        None => warn!("No config file found, using defaults"),
    }

    let metrics = StatusMetrics::new()?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.prom_port));
    let exporter = metrics.clone();
    tokio::spawn(async move {
        if let Err(e) = serve_metrics(addr, exporter).await {
            error!("Failed to start Prometheus: {:#}", e);
        }
    });

    run_status_checker(&config, metrics).await
}
