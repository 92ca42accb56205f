//! Link liveness checking
//!
//! Issues HEAD probes against discovered links under two joint constraints:
//! an admission ticker that bounds how many probes may be scheduled per
//! second, and a semaphore that bounds how many probes run at once. The two
//! gates are distinct: a probe can be admitted by the ticker and still queue
//! for a permit. Probes that fail at the transport level are dropped
//! silently; only completed responses with an error-range status (excluding
//! 429) produce broken-link records.

use crate::config::CrawlerConfig;
use crate::storage::TaskStore;
use reqwest::Client;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Interval;

/// Inclusive lower and exclusive upper bound of the error status range
const ERROR_STATUS_RANGE: std::ops::Range<u16> = 400..600;

/// Status treated as non-broken so that being throttled by the target does
/// not surface as a false positive
const RATE_LIMITED_STATUS: u16 = 429;

/// Returns true if a completed probe response counts as a broken link
pub fn is_broken_status(status_code: u16) -> bool {
    ERROR_STATUS_RANGE.contains(&status_code) && status_code != RATE_LIMITED_STATUS
}

/// Dispatches and tracks liveness probes for one run
///
/// Owned by the runner; `check` is called from the dispatch loop and `drain`
/// joins every probe before the run finalizes.
pub struct LivenessChecker<S: TaskStore + Send + 'static> {
    client: Client,
    store: Arc<Mutex<S>>,
    semaphore: Arc<Semaphore>,
    ticker: Interval,
    probes: JoinSet<()>,
    broken: Arc<AtomicU32>,
}

impl<S: TaskStore + Send + 'static> LivenessChecker<S> {
    /// Creates a checker with the configured admission rate and concurrency
    /// bound
    ///
    /// Must be called from within a tokio runtime (the admission ticker is a
    /// runtime timer).
    pub fn new(client: Client, store: Arc<Mutex<S>>, limits: &CrawlerConfig) -> Self {
        let period = Duration::from_secs_f64(1.0 / limits.rate_limit_per_sec as f64);
        Self {
            client,
            store,
            semaphore: Arc::new(Semaphore::new(limits.max_concurrent_checks as usize)),
            ticker: tokio::time::interval(period),
            probes: JoinSet::new(),
            broken: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Schedules a liveness probe for one link
    ///
    /// Suspends the caller until the admission ticker yields a tick; this is
    /// the backpressure that couples dispatch speed to probe throughput. The
    /// probe itself runs as an independent task and acquires a concurrency
    /// permit before touching the network.
    pub async fn check(&mut self, task_id: i64, link: String) {
        self.ticker.tick().await;

        let client = self.client.clone();
        let store = Arc::clone(&self.store);
        let semaphore = Arc::clone(&self.semaphore);
        let broken = Arc::clone(&self.broken);

        self.probes.spawn(async move {
            // Permit is held for the whole probe and released on every exit
            // path when it drops
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            let response = match client.head(&link).send().await {
                Ok(response) => response,
                Err(e) => {
                    // Transport failures are dropped: only probes that
                    // complete with a response are evaluated
                    tracing::debug!("Probe for {} failed, dropping: {}", link, e);
                    return;
                }
            };

            let status_code = response.status().as_u16();
            if is_broken_status(status_code) {
                broken.fetch_add(1, Ordering::Relaxed);
                tracing::info!("Broken link: {} ({})", link, status_code);

                let result = store
                    .lock()
                    .unwrap()
                    .append_broken_link(task_id, &link, status_code);
                if let Err(e) = result {
                    tracing::error!("Failed to record broken link {}: {}", link, e);
                }
            }
        });
    }

    /// Waits for every dispatched probe to complete
    ///
    /// This is the only synchronization point between the dispatch loop and
    /// run finalization.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.probes.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Probe task failed to join: {}", e);
            }
        }
    }

    /// Number of broken links recorded by completed probes so far
    ///
    /// Only stable after `drain` has returned.
    pub fn broken_count(&self) -> u32 {
        self.broken.load(Ordering::Relaxed)
    }
}
