//! Dashboard polling.
//!
//! The dashboard re-fetches execution stats and the recent execution list on
//! a fixed interval. Fetch failures are logged at debug level and the
//! previous state stays on screen; the next tick retries.
//!
//! Overlapping refreshes are guarded with a generation counter: each refresh
//! takes a generation at the start and only applies its result while still
//! the newest, so a slow response can never overwrite the result of a
//! refresh that started after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::api::protocol::{ExecutionStats, JobExecution};
use crate::api::MigrationBackend;

/// How many recent executions the dashboard shows.
const RECENT_EXECUTIONS: i32 = 20;

/// The data behind the dashboard view.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub stats: ExecutionStats,
    pub recent: Vec<JobExecution>,
    /// Count of completed refreshes, so views can tell "empty" from
    /// "not loaded yet".
    pub refreshes: u64,
}

/// Periodic dashboard fetcher.
pub struct DashboardPoller {
    backend: Arc<dyn MigrationBackend>,
    state: Arc<Mutex<DashboardState>>,
    generation: AtomicU64,
    interval: Duration,
}

impl DashboardPoller {
    pub fn new(backend: Arc<dyn MigrationBackend>, interval: Duration) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(DashboardState::default())),
            generation: AtomicU64::new(0),
            interval,
        }
    }

    /// Snapshot of the current dashboard state.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// Fetch once and apply the result if this refresh is still the newest.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let stats = self.backend.get_execution_stats().await;
        let recent = self
            .backend
            .get_job_executions(Some(RECENT_EXECUTIONS))
            .await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dashboard refresh superseded; dropping result");
            return;
        }

        let mut state = self.state.lock().await;
        match stats {
            Ok(stats) => state.stats = stats,
            Err(e) => debug!(error = %e, "dashboard stats fetch failed"),
        }
        match recent {
            Ok(recent) => state.recent = recent,
            Err(e) => debug!(error = %e, "dashboard executions fetch failed"),
        }
        state.refreshes += 1;
    }

    /// Poll on the configured interval until `shutdown` fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh().await,
                _ = shutdown.changed() => break,
            }
        }
    }
}
