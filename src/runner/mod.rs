//! Discovers check programs and keeps each enabled one running on its interval.

pub mod discovery;
pub mod executor;
pub mod scheduler;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::ops::StatusMetrics;

pub use discovery::{discover_checks, DiscoveredCheck};
pub use executor::run_check;
pub use scheduler::{delay_until_next_tick, run_check_loop};

/// Spawns one loop per enabled check and waits on them.
///
/// Returns immediately when nothing is scheduled; otherwise only returns once
/// every loop has ended, which normally never happens.
pub async fn run_status_checker(config: &Config, metrics: StatusMetrics) -> anyhow::Result<()> {
    let checks = discover_checks(&config.checks_dir, config.modify_permissions);
    if checks.is_empty() {
        warn!(checks_dir = %config.checks_dir.display(), "No checks found");
        return Ok(());
    }

    let mut loops = JoinSet::new();
    for check in checks {
        let settings = config.check_settings(&check.name);
        if !settings.enabled {
            debug!(check = %check.name, "Skipping disabled check");
            continue;
        }
        info!(check = %check.name, interval = ?settings.interval, "Scheduling check");
        loops.spawn(run_check_loop(check, settings.interval, metrics.clone()));
    }

    if loops.is_empty() {
        warn!("All discovered checks are disabled");
        return Ok(());
    }

    info!(checks = loops.len(), "Starting status-checker");
    while let Some(joined) = loops.join_next().await {
        if let Err(e) = joined {
            error!("Check loop terminated: {}", e);
        }
    }
    Ok(())
}
