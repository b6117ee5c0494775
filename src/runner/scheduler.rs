//! Per-check loops aligned to wall-clock interval boundaries.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{info, trace};

use super::discovery::DiscoveredCheck;
use super::executor::run_check;
use crate::ops::StatusMetrics;

/// Time to wait from `now` (since the Unix epoch) until the next tick.
///
/// The tick is `now + interval/2` rounded half-up to a multiple of
/// `interval`, so runs of every check line up on the same boundaries and the
/// wait is never longer than one interval.
pub fn delay_until_next_tick(now: Duration, interval: Duration) -> Duration {
    let step = interval.as_nanos();
    if step == 0 {
        return Duration::ZERO;
    }
    let now = now.as_nanos();
    let shifted = now + step / 2;
    let remainder = shifted % step;
    let target = if remainder + remainder < step {
        shifted - remainder
    } else {
        shifted + (step - remainder)
    };
    let wait = target.saturating_sub(now);
    Duration::from_nanos(u64::try_from(wait).unwrap_or(u64::MAX))
}

/// Sleeps until the next tick of `interval`.
pub async fn block_for(interval: Duration, check: &str) {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let wait = delay_until_next_tick(now, interval);
    trace!(check, wait_ms = wait.as_millis() as u64, "Blocking");
    tokio::time::sleep(wait).await;
}

/// Runs `check` forever: run, record, wait for the next tick.
pub async fn run_check_loop(check: DiscoveredCheck, interval: Duration, metrics: StatusMetrics) {
    loop {
        let ok = run_check(&check.path, &check.name).await;
        info!(check = %check.name, success = ok, "Check finished");
        metrics.record(&check.name, ok);

        block_for(interval, &check.name).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(100, 30, 20 ; "rounds up to the next boundary")]
    #[test_case(119, 30, 1 ; "just before a boundary")]
    #[test_case(120, 30, 30 ; "on a boundary waits a full interval")]
    #[test_case(104, 30, 16 ; "past half rounds up")]
    #[test_case(105, 30, 15 ; "shifted time already on a boundary")]
    #[test_case(0, 60, 60 ; "epoch")]
    fn test_delay_until_next_tick(now_secs: u64, interval_secs: u64, expected_secs: u64) {
        let wait = delay_until_next_tick(
            Duration::from_secs(now_secs),
            Duration::from_secs(interval_secs),
        );
        assert_eq!(wait, Duration::from_secs(expected_secs));
    }

    #[test]
    fn test_delay_never_exceeds_interval() {
        let interval = Duration::from_millis(7_500);
        for ms in (0..60_000u64).step_by(137) {
            let wait = delay_until_next_tick(Duration::from_millis(ms), interval);
            assert!(wait <= interval, "wait {wait:?} at {ms}ms");
        }
    }

    #[test]
    fn test_zero_interval() {
        assert_eq!(delay_until_next_tick(Duration::from_secs(5), Duration::ZERO), Duration::ZERO);
    }
}
