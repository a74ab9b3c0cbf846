#![forbid(unsafe_code)]

//! Rerun signaling.
//!
//! A host that re-renders on demand only shows new state after it reruns,
//! so every state mutation that must become visible ends in a [`Rerun`]
//! value. The dispatcher returns it; the host decides what to do with it
//! (re-invoke its render cycle, or ignore it in a headless test).
//!
//! # Pacing
//!
//! [`RerunController`] can hold a signal back until a minimum execution time
//! has elapsed since the lookup started. This only damps rapid rerun storms
//! on hosts whose renderer misbehaves under very short cycles; it is a pure
//! delay and never changes what is signaled.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::instrument;

/// How much of the host page a rerun covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerunScope {
    /// Only the fragment containing the widget.
    Fragment,
    /// The whole application.
    #[default]
    #[serde(alias = "application")]
    App,
}

impl RerunScope {
    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fragment => "fragment",
            Self::App => "app",
        }
    }
}

/// Outcome of a state mutation with respect to re-rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rerun {
    /// Nothing new to show.
    #[default]
    None,
    /// The host should rerun at the given scope.
    Request(RerunScope),
}

impl Rerun {
    #[must_use]
    pub const fn is_requested(self) -> bool {
        matches!(self, Self::Request(_))
    }

    #[must_use]
    pub const fn scope(self) -> Option<RerunScope> {
        match self {
            Self::None => None,
            Self::Request(scope) => Some(scope),
        }
    }

    /// Combine two signals; the wider request wins.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, x) | (x, Self::None) => x,
            (Self::Request(a), Self::Request(b)) => Self::Request(a.max(b)),
        }
    }
}

/// What the host can do with a rerun request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether the host can rerun a single fragment. Hosts without it get
    /// every fragment request widened to [`RerunScope::App`].
    pub scoped_rerun: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self { scoped_rerun: true }
    }
}

impl HostCapabilities {
    /// Host that can only rerun everything.
    #[must_use]
    pub const fn app_only() -> Self {
        Self {
            scoped_rerun: false,
        }
    }

    #[must_use]
    pub const fn effective_scope(self, scope: RerunScope) -> RerunScope {
        if self.scoped_rerun {
            scope
        } else {
            RerunScope::App
        }
    }
}

/// Emits [`Rerun`] signals, optionally paced by a minimum execution time.
#[derive(Debug, Clone)]
pub struct RerunController<C = SystemClock> {
    min_execution_time: Duration,
    capabilities: HostCapabilities,
    clock: C,
}

impl RerunController<SystemClock> {
    /// Controller on the system clock with no pacing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for RerunController<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RerunController<C> {
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            min_execution_time: Duration::ZERO,
            capabilities: HostCapabilities::default(),
            clock,
        }
    }

    /// Set the minimum execution time floor.
    ///
    /// Deprecated knob; a non-zero value is logged once here.
    #[must_use]
    pub fn with_min_execution_time(mut self, floor: Duration) -> Self {
        if !floor.is_zero() {
            tracing::warn!(
                target: "searchbox.rerun",
                min_execution_time_ms = u64::try_from(floor.as_millis()).unwrap_or(u64::MAX),
                "min_execution_time is deprecated and will be removed"
            );
        }
        self.min_execution_time = floor;
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn min_execution_time(&self) -> Duration {
        self.min_execution_time
    }

    #[must_use]
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current monotonic time, used to stamp the start of a lookup.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Request a rerun once the floor has elapsed since `started_at`.
    pub fn request_paced(&self, scope: RerunScope, started_at: Duration) -> Rerun {
        let paced = self.pace(started_at);
        self.emit(scope, paced)
    }

    /// Request a rerun immediately.
    pub fn request(&self, scope: RerunScope) -> Rerun {
        self.emit(scope, Duration::ZERO)
    }

    fn pace(&self, started_at: Duration) -> Duration {
        if self.min_execution_time.is_zero() {
            return Duration::ZERO;
        }
        let elapsed = self.clock.now_mono().saturating_sub(started_at);
        if elapsed >= self.min_execution_time {
            return Duration::ZERO;
        }
        let remaining = self.min_execution_time - elapsed;
        self.clock.sleep(remaining);
        remaining
    }

    fn emit(&self, scope: RerunScope, paced: Duration) -> Rerun {
        let scope = self.capabilities.effective_scope(scope);
        instrument::record_rerun(
            scope.as_str(),
            u64::try_from(paced.as_micros()).unwrap_or(u64::MAX),
        );
        Rerun::Request(scope)
    }
}
