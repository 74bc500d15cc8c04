//! Periodic re-runs of the organizer.
//!
//! Runs are strictly sequential: the next wait only starts once the previous
//! job has returned, so two passes never overlap on the same directory.
//!
//! Notes:
//! - The first run happens one full interval after `run` is called.
//! - Shutdown is polled once per tick, so a stop request is honoured within
//!   one tick even in the middle of a long interval.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Cooperative stop flag shared between a signal handler and the scheduler.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop (idempotent).
    #[inline]
    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Runs a job every `interval` until shut down.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    tick: Duration,
}

impl Scheduler {
    /// Polls for shutdown once a second.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            tick: Duration::from_secs(1),
        }
    }

    /// Shorthand for an interval given in whole minutes.
    pub fn every_minutes(minutes: u64) -> Self {
        Self::every(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Overrides the polling granularity. Clamped to the interval.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.min(self.interval).max(Duration::from_millis(1));
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks, running `job` once per interval, until `shutdown` is requested.
    /// Returns how many runs completed.
    ///
    /// An interval too large to represent as a point in time never elapses;
    /// the scheduler then only waits for shutdown.
    pub fn run<J: FnMut()>(&self, shutdown: &Shutdown, mut job: J) -> usize {
        let mut runs = 0;
        let mut next_run = Instant::now().checked_add(self.interval);

        while !shutdown.is_requested() {
            let now = Instant::now();
            match next_run {
                Some(due) if now >= due => {
                    job();
                    runs += 1;
                    next_run = Instant::now().checked_add(self.interval);
                }
                Some(due) => thread::sleep(self.tick.min(due - now)),
                None => thread::sleep(self.tick),
            }
        }

        tracing::debug!("Scheduler stopped after {} runs", runs);
        runs
    }
}
