#![forbid(unsafe_code)]

//! Headless host that behaves like a rerun-on-demand page.
//!
//! The simulated widget keeps its last reported value for as long as its
//! render identity stays the same, and re-delivers it on every pass. A new
//! identity mounts a fresh widget whose value is `null`. Each user action
//! runs passes until no rerun is requested.
//!
//! A record replaced without a rerun counts as remounted before the next
//! user action, so that action is not lost.

use std::sync::atomic::{AtomicU64, Ordering};

use searchbox_core::{Interaction, SearchSession, SessionStore, Value};
use searchbox_runtime::{Clock, Lookup, SystemClock};
use searchbox_web::{BridgeError, BridgeProps, SearchboxComponent, encode_bridge_event};
use tracing::info_span;

/// Passes allowed per user action unless overridden.
pub const DEFAULT_MAX_PASSES: usize = 8;

static HOST_PASSES_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Render passes run by every simulator in this process.
#[must_use]
pub fn host_passes_total() -> u64 {
    HOST_PASSES_TOTAL.load(Ordering::Relaxed)
}

/// Errors from a simulated action.
#[derive(Debug)]
pub enum HarnessError {
    Bridge(BridgeError),
    /// Reruns kept being requested past the pass limit.
    RerunLoop { passes: usize },
}

impl core::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bridge(err) => write!(f, "{err}"),
            Self::RerunLoop { passes } => write!(f, "still rerunning after {passes} passes"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bridge(err) => Some(err),
            Self::RerunLoop { .. } => None,
        }
    }
}

impl From<BridgeError> for HarnessError {
    fn from(err: BridgeError) -> Self {
        Self::Bridge(err)
    }
}

/// Result of one user action.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Passes run, including the first.
    pub passes: usize,
    /// Value the caller saw on the last pass.
    pub value: Value,
    /// Props the widget was given on the last pass.
    pub props: BridgeProps,
}

/// Widget-side state the host keeps between passes.
#[derive(Debug, Default)]
struct MountedWidget {
    identity: Option<String>,
    report: Value,
}

/// Drives one searchbox through simulated render passes.
#[derive(Debug)]
pub struct HostSimulator<L, C = SystemClock> {
    store: SessionStore,
    component: SearchboxComponent<L, C>,
    widget: MountedWidget,
    max_passes: usize,
}

impl<L: Lookup, C: Clock> HostSimulator<L, C> {
    #[must_use]
    pub fn new(component: SearchboxComponent<L, C>) -> Self {
        Self::with_store(SessionStore::new(), component)
    }

    /// Simulator over an existing store, e.g. one shared with other widgets.
    #[must_use]
    pub fn with_store(store: SessionStore, component: SearchboxComponent<L, C>) -> Self {
        Self {
            store,
            component,
            widget: MountedWidget::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// Give the store back, e.g. to hand it to the next widget.
    #[must_use]
    pub fn into_store(self) -> SessionStore {
        self.store
    }

    #[must_use]
    pub fn component(&self) -> &SearchboxComponent<L, C> {
        &self.component
    }

    /// This widget's record, if created.
    #[must_use]
    pub fn session(&self) -> Option<&SearchSession> {
        self.store.get(self.component.dispatcher().key()).ok()
    }

    /// A host rerun with no user action.
    pub fn idle(&mut self) -> Result<CycleReport, HarnessError> {
        self.run("idle")
    }

    pub fn type_term(&mut self, term: &str) -> Result<CycleReport, HarnessError> {
        self.act(Interaction::Search(term.to_owned()))
    }

    /// Pick the option at `index`.
    pub fn select(&mut self, index: usize) -> Result<CycleReport, HarnessError> {
        self.act(Interaction::select(index))
    }

    /// Submit free text when no options are shown.
    pub fn submit_literal(&mut self, value: impl Into<Value>) -> Result<CycleReport, HarnessError> {
        self.act(Interaction::Submit(value.into()))
    }

    /// Press the clear button.
    pub fn clear(&mut self) -> Result<CycleReport, HarnessError> {
        self.act(Interaction::Reset)
    }

    fn act(&mut self, event: Interaction) -> Result<CycleReport, HarnessError> {
        let key = self.component.dispatcher().key().to_owned();
        self.remount_if_changed(&key);
        self.widget.report = encode_bridge_event(Some(&event));
        self.run(event.kind().as_str())
    }

    fn run(&mut self, action: &str) -> Result<CycleReport, HarnessError> {
        let key = self.component.dispatcher().key().to_owned();
        let _span = info_span!("searchbox.harness", key = %key, action = %action).entered();

        let mut passes = 0;
        loop {
            passes += 1;
            HOST_PASSES_TOTAL.fetch_add(1, Ordering::Relaxed);
            self.remount_if_changed(&key);

            let report = self.widget.report.clone();
            let rendered = self.component.render_value(&mut self.store, report)?;
            self.widget.identity = Some(rendered.props.key.clone());

            tracing::debug!(
                target: "searchbox.harness",
                pass = passes,
                rerun = rendered.rerun.is_requested(),
                "pass rendered"
            );

            if !rendered.rerun.is_requested() {
                return Ok(CycleReport {
                    passes,
                    value: rendered.value,
                    props: rendered.props,
                });
            }
            if passes >= self.max_passes {
                return Err(HarnessError::RerunLoop { passes });
            }
        }
    }

    /// A new render identity means the page mounts a fresh widget.
    fn remount_if_changed(&mut self, key: &str) {
        let current = self
            .store
            .get(key)
            .ok()
            .map(|s| s.render_identity().to_string());
        if current.is_some() && current != self.widget.identity {
            if self.widget.identity.is_some() {
                self.widget.report = Value::Null;
            }
            self.widget.identity = current;
        }
    }
}
