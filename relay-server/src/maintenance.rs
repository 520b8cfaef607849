//! Background maintenance task.
//!
//! The message log never shrinks, but rate limiter state is keyed by client
//! address. This task periodically evicts idle clients so limiter memory
//! tracks active clients rather than every address ever seen.

use crate::config::MaintenanceConfig;
use crate::limits::RateLimits;
use std::time::Duration;
use tokio::time::interval;

/// Spawn a background maintenance task.
///
/// Returns a handle that can be used to abort the task.
pub fn spawn_maintenance_task(
    rate_limits: RateLimits,
    config: MaintenanceConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !config.enabled {
            tracing::info!("Maintenance task disabled");
            return;
        }

        let interval_secs = config.interval_secs.max(1);
        tracing::info!("Maintenance task started (interval: {}s)", interval_secs);

        let mut timer = interval(Duration::from_secs(interval_secs));

        loop {
            timer.tick().await;

            let before = rate_limits.post_keys_count();
            rate_limits.shrink();
            let after = rate_limits.post_keys_count();

            if before > after {
                tracing::info!("Maintenance: evicted {} idle limiter keys", before - after);
            } else {
                tracing::debug!("Maintenance: no idle limiter keys ({} tracked)", after);
            }
        }
    })
}
