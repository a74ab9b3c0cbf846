#![forbid(unsafe_code)]

//! Monotonic clocks for pacing rerun signals.
//!
//! The runtime only needs two things from time: "how long since X" and
//! "wait this long". [`SystemClock`] answers with the real clock;
//! [`ManualClock`] is host-driven and never blocks, which keeps tests and
//! WASM hosts deterministic.
//!
//! [`SystemClock::sleep`] blocks the thread, and `wasm32-unknown-unknown`
//! cannot do that. WASM hosts with `min_execution_time_ms > 0` must use
//! [`ManualClock`]; zero-length waits return without touching the thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{Duration, Instant};

/// Monotonic time source with a blocking wait.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now_mono(&self) -> Duration;

    /// Block the current cycle for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`web_time::Instant`].
///
/// Non-zero sleeps block the thread, so this clock is native-only when an
/// execution-time floor is configured.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        std::thread::sleep(duration);
    }
}

/// Deterministic clock advanced explicitly by the host.
///
/// Clones share the same timeline, so a test can keep one handle while the
/// runtime owns another. `sleep` advances the timeline instead of blocking
/// and is tallied for inspection.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ns: Arc<AtomicU64>,
    slept_ns: Arc<AtomicU64>,
    sleeps: Arc<AtomicU64>,
}

fn as_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timeline by `dt`, e.g. to simulate a slow lookup.
    pub fn advance(&self, dt: Duration) {
        let _ = self
            .now_ns
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |now| {
                Some(now.saturating_add(as_nanos(dt)))
            });
    }

    /// Total time spent in [`Clock::sleep`].
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        Duration::from_nanos(self.slept_ns.load(Ordering::Relaxed))
    }

    /// Number of [`Clock::sleep`] calls.
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::Relaxed)
    }
}

impl Clock for ManualClock {
    fn now_mono(&self) -> Duration {
        Duration::from_nanos(self.now_ns.load(Ordering::Relaxed))
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::Relaxed);
        self.slept_ns
            .fetch_add(as_nanos(duration), Ordering::Relaxed);
        self.advance(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_mono(&self) -> Duration {
        (**self).now_mono()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
