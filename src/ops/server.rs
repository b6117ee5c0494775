//! HTTP exposition of [`StatusMetrics`] for Prometheus scraping.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, info};

use super::metrics::StatusMetrics;

pub fn router(metrics: StatusMetrics) -> Router {
    Router::new().route("/metrics", get(metrics_handler)).with_state(metrics)
}

async fn metrics_handler(State(metrics): State<StatusMetrics>) -> Response {
    match metrics.export_metrics() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response()
        }
    }
}

/// Serves `/metrics` on `addr` until the process exits.
pub async fn serve_metrics(addr: SocketAddr, metrics: StatusMetrics) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Starting Prometheus exporter");
    axum::serve(listener, router(metrics)).await?;
    Ok(())
}
