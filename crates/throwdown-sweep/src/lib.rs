//! Periodic eviction of stale sessions for Throwdown.
//!
//! A match nobody finishes would otherwise live in memory forever. The
//! [`Sweeper`] runs one pass every [`SweepConfig::interval`] and evicts
//! every session older than [`SweepConfig::ttl`]: unresolved ones are
//! reported as expired, resolved ones (kept around so late button clicks
//! get a sensible answer) are retired.
//!
//! # Integration
//!
//! ```ignore
//! let handle = Sweeper::new(Arc::clone(&store), SweepConfig::default()).spawn();
//! // ... serve requests ...
//! handle.stop().await;
//! ```
//!
//! Dropping the [`SweeperHandle`] also stops the task at its next wakeup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use throwdown_session::{SessionStatus, SessionStore};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Time between passes. Default: one minute.
    pub interval: Duration,
    /// Sessions strictly older than this are evicted. Default: 30 minutes.
    pub ttl: Duration,
    /// Random delay (0..jitter) before the first pass. Default: none.
    pub initial_jitter: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            ttl: Duration::from_secs(30 * 60),
            initial_jitter: Duration::ZERO,
        }
    }
}

impl SweepConfig {
    /// Shortest interval the sweeper will run at.
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    /// Default config with a custom time-to-live.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Sweeper::new`]. Rules:
    /// - `interval` raised to at least [`Self::MIN_INTERVAL`].
    /// - `initial_jitter` capped to `interval`.
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "sweep interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        if self.initial_jitter > self.interval {
            self.initial_jitter = self.interval;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters accumulated over the sweeper's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Completed passes.
    pub passes: u64,
    /// Sessions removed, any status.
    pub evicted: u64,
    /// Removed sessions that never got resolved.
    pub expired: u64,
    /// Removed sessions that had been resolved.
    pub retired: u64,
}

#[derive(Debug, Default)]
struct Counters {
    passes: AtomicU64,
    expired: AtomicU64,
    retired: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SweepStats {
        let expired = self.expired.load(Ordering::Relaxed);
        let retired = self.retired.load(Ordering::Relaxed);
        SweepStats {
            passes: self.passes.load(Ordering::Relaxed),
            evicted: expired + retired,
            expired,
            retired,
        }
    }
}

// ---------------------------------------------------------------------------
// Sweeper
// ---------------------------------------------------------------------------

/// Evicts stale sessions from a shared [`SessionStore`].
pub struct Sweeper {
    store: Arc<SessionStore>,
    config: SweepConfig,
    counters: Arc<Counters>,
}

impl Sweeper {
    /// Creates a sweeper over `store`. Nothing runs until [`spawn`](Self::spawn)
    /// or [`sweep_now`](Self::sweep_now).
    pub fn new(store: Arc<SessionStore>, config: SweepConfig) -> Self {
        Self {
            store,
            config: config.validated(),
            counters: Arc::default(),
        }
    }

    /// The effective (validated) configuration.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs a single pass immediately. Returns how many sessions were evicted.
    pub async fn sweep_now(&self) -> usize {
        let counters = &self.counters;
        let evicted = self
            .store
            .for_each_expired(self.config.ttl, |session| {
                let age_secs = session.age().as_secs();
                if session.status == SessionStatus::Resolved {
                    counters.retired.fetch_add(1, Ordering::Relaxed);
                    debug!(session_id = %session.id, age_secs, "resolved session retired");
                } else {
                    counters.expired.fetch_add(1, Ordering::Relaxed);
                    info!(
                        session_id = %session.id,
                        challenger = %session.challenger,
                        target = %session.target,
                        age_secs,
                        "session expired before resolution"
                    );
                }
            })
            .await;
        counters.passes.fetch_add(1, Ordering::Relaxed);

        if evicted > 0 {
            debug!(evicted, "sweep pass finished");
        }
        evicted
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> SweepStats {
        self.counters.snapshot()
    }

    /// Moves the sweeper onto its own task and returns a handle to stop it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> SweeperHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let counters = Arc::clone(&self.counters);
        let task = tokio::spawn(self.run(stop_rx));
        SweeperHandle {
            stop: Some(stop_tx),
            task,
            counters,
        }
    }

    async fn run(self, mut stop: oneshot::Receiver<()>) {
        let max_us = u64::try_from(self.config.initial_jitter.as_micros()).unwrap_or(u64::MAX);
        let jitter = if max_us == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(rand::rng().random_range(0..max_us))
        };

        let mut ticker = time::interval_at(Instant::now() + jitter, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.config.interval.as_secs(),
            ttl_secs = self.config.ttl.as_secs(),
            "sweeper started"
        );

        loop {
            tokio::select! {
                // Fires on an explicit stop and when the handle is dropped.
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    self.sweep_now().await;
                }
            }
        }

        info!("sweeper stopped");
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Controls a spawned [`Sweeper`].
#[must_use = "dropping the handle stops the sweeper"]
pub struct SweeperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl SweeperHandle {
    /// Snapshot of the counters.
    pub fn stats(&self) -> SweepStats {
        self.counters.snapshot()
    }

    /// Returns `true` while the background task is alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the task to stop and waits for it to finish.
    ///
    /// A pass already in progress completes first.
    pub async fn stop(mut self) -> SweepStats {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "sweeper task ended abnormally");
        }
        self.counters.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_policy() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.interval, Duration::from_secs(60));
        assert_eq!(cfg.ttl, Duration::from_secs(1800));
        assert_eq!(cfg.initial_jitter, Duration::ZERO);
    }

    #[test]
    fn test_validated_clamps_interval_and_jitter() {
        let cfg = SweepConfig {
            interval: Duration::from_millis(10),
            ttl: Duration::from_secs(5),
            initial_jitter: Duration::from_secs(10),
        }
        .validated();
        assert_eq!(cfg.interval, SweepConfig::MIN_INTERVAL);
        assert_eq!(cfg.initial_jitter, SweepConfig::MIN_INTERVAL);
        assert_eq!(cfg.ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_with_ttl_keeps_default_interval() {
        let cfg = SweepConfig::with_ttl(Duration::from_secs(90));
        assert_eq!(cfg.ttl, Duration::from_secs(90));
        assert_eq!(cfg.interval, Duration::from_secs(60));
    }

    #[test]
    fn test_counters_snapshot_sums_evicted() {
        let counters = Counters::default();
        counters.expired.store(3, Ordering::Relaxed);
        counters.retired.store(2, Ordering::Relaxed);
        counters.passes.store(7, Ordering::Relaxed);
        assert_eq!(
            counters.snapshot(),
            SweepStats {
                passes: 7,
                evicted: 5,
                expired: 3,
                retired: 2,
            }
        );
    }
}
