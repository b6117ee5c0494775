pub mod metrics;
pub mod server;

pub use metrics::StatusMetrics;
