//! src/ops/metrics.rs
//!
//! Prometheus counters for check outcomes.

use anyhow::Result;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub const STATUS_CHECK_METRIC: &str = "status_check";

/// Cloneable handle over a registry holding the `status_check` counter.
#[derive(Clone)]
pub struct StatusMetrics {
    registry: Registry,
    status_check: IntCounterVec,
}

impl StatusMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let status_check = IntCounterVec::new(
            Opts::new(STATUS_CHECK_METRIC, "Number of check runs by check and outcome"),
            &["check", "success"],
        )?;
        registry.register(Box::new(status_check.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

        Ok(Self { registry, status_check })
    }

    /// Counts one run of `check`.
    pub fn record(&self, check: &str, success: bool) {
        self.status_check.with_label_values(&[check, bool_label(success)]).inc();
    }

    /// Runs of `check` with the given outcome so far.
    pub fn count(&self, check: &str, success: bool) -> u64 {
        self.status_check.with_label_values(&[check, bool_label(success)]).get()
    }

    /// Text exposition of every registered metric.
    pub fn export_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn bool_label(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_and_count() {
        let metrics = StatusMetrics::new().unwrap();
        assert_eq!(metrics.count("block-height", true), 0);

        metrics.record("block-height", true);
        metrics.record("block-height", true);
        metrics.record("block-height", false);
        metrics.record("disk.sh", false);

        assert_eq!(metrics.count("block-height", true), 2);
        assert_eq!(metrics.count("block-height", false), 1);
        assert_eq!(metrics.count("disk.sh", false), 1);
        assert_eq!(metrics.count("disk.sh", true), 0);
    }

    #[test]
    fn test_export_contains_labels() {
        let metrics = StatusMetrics::new().unwrap();
        metrics.record("block-height", false);

        let text = metrics.export_metrics().unwrap();
        assert!(text.contains("# TYPE status_check counter"));
        assert!(text.contains(r#"status_check{check="block-height",success="false"} 1"#));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_export_includes_process_metrics() {
        let text = StatusMetrics::new().unwrap().export_metrics().unwrap();
        assert!(text.contains("process_cpu_seconds_total"));
        assert!(text.contains("process_resident_memory_bytes"));
    }

    #[test]
    fn test_clones_share_registry() {
        let metrics = StatusMetrics::new().unwrap();
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let m = metrics.clone();
                thread::spawn(move || m.record("concurrent", true))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.count("concurrent", true), 10);
    }
}
