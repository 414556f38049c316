//! Stats Poller: periodic refresh of the aggregate counts.
//!
//! The refresh timer runs as its own task and never waits on, or blocks, a workflow step.

use crate::error::ClientError;
use crate::gateway::CarePlanGateway;
use crate::notify::Notifier;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub const STATS_FAILED: &str = "Failed to load stats due to an internal error";

struct StatsLoader {
    gateway: Arc<dyn CarePlanGateway>,
    notifier: Notifier,
}

impl StatsLoader {
    async fn load(&self) {
        match self.gateway.fetch_stats().await {
            Ok(stats) => {
                debug!(
                    total_orders = stats.total_orders,
                    total_patients = stats.total_patients,
                    total_providers = stats.total_providers,
                    "Stats refreshed"
                );
                self.notifier.update_stats(stats);
            }
            Err(e) => {
                warn!(error = %e, "Stats refresh failed");
                self.notifier.show_error(STATS_FAILED);
                self.notifier.stats_unavailable();
            }
        }
    }
}

/// Owns the refresh timer. Dropping the poller cancels it.
pub struct StatsPoller {
    loader: Arc<StatsLoader>,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl StatsPoller {
    pub fn new(gateway: Arc<dyn CarePlanGateway>, notifier: Notifier) -> Self {
        Self {
            loader: Arc::new(StatsLoader { gateway, notifier }),
            refresh: Mutex::new(None),
        }
    }

    /// Fetch and display the current snapshot, or mark the stats unavailable.
    pub async fn load(&self) {
        self.loader.load().await;
    }

    /// Show the loading marker, load once, then refresh every `interval`.
    pub async fn initialize(&self, interval: Duration) -> Result<(), ClientError> {
        self.loader.notifier.stats_loading();
        self.load().await;
        self.start_auto_refresh(interval)
    }

    /// Replace any running schedule with one that loads once per `interval`, first
    /// firing one interval from now. Must be called inside a tokio runtime.
    pub fn start_auto_refresh(&self, interval: Duration) -> Result<(), ClientError> {
        if interval.is_zero() {
            return Err(ClientError::ConfigError(
                "Stats refresh interval must be greater than zero".to_string(),
            ));
        }
        self.stop_auto_refresh();

        let loader = Arc::clone(&self.loader);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                loader.load().await;
            }
        });
        *self.refresh.lock() = Some(handle);
        info!(interval_ms = interval.as_millis() as u64, "Stats auto-refresh started");
        Ok(())
    }

    /// Cancel the schedule. Safe to call when nothing is running.
    pub fn stop_auto_refresh(&self) {
        if let Some(handle) = self.refresh.lock().take() {
            handle.abort();
            info!("Stats auto-refresh stopped");
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.refresh.get_mut().take() {
            handle.abort();
        }
    }
}
