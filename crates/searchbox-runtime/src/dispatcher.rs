#![forbid(unsafe_code)]

//! Interaction state machine.
//!
//! One [`InteractionDispatcher`] owns everything a single widget needs to
//! turn an [`Interaction`] into a session update: its configuration, its
//! lookup, its hooks and its rerun controller. The session record itself
//! lives in the host's [`SessionStore`] and is passed in on every call, so
//! the record survives even when the dispatcher is rebuilt each cycle.
//!
//! # Cycle
//!
//! ```text
//! dispatch(store, event)
//!   ├─ get_or_init(key, seed)          record exists from here on
//!   ├─ None          → result unchanged
//!   ├─ Search(term)  → dedup, lookup, encode, maybe rerun
//!   ├─ Submit(value) → resolve index, commit, hook, maybe clear + rerun
//!   └─ Reset         → fresh record, hook, maybe rerun
//! ```
//!
//! # Deferred lookups
//!
//! Hosts that run lookups off the render cycle split a search in two:
//! [`InteractionDispatcher::begin_search`] commits the term and hands out a
//! [`PendingSearch`], and [`InteractionDispatcher::complete_search`] applies
//! the results later. A completion whose term no longer matches the record's
//! term is discarded.

use web_time::Duration;

use searchbox_core::{
    Interaction, Item, MalformedResult, SessionSeed, SessionStore, SessionUnavailable, Value,
    encode,
};

use crate::clock::{Clock, SystemClock};
use crate::config::SearchboxConfig;
use crate::hooks::Hooks;
use crate::instrument;
use crate::lookup::{Lookup, LookupArgs, LookupError, LookupResult};
use crate::rerun::{HostCapabilities, Rerun, RerunController};

/// Result of handling one cycle's event.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Value reported to the caller for this cycle.
    pub value: Value,
    /// Whether the host should rerun.
    pub rerun: Rerun,
    /// Whether the lookup was invoked.
    pub lookup_ran: bool,
    /// Whether a submit changed the committed result.
    pub submitted: bool,
}

impl Outcome {
    fn idle(value: Value) -> Self {
        Self {
            value,
            rerun: Rerun::None,
            lookup_ran: false,
            submitted: false,
        }
    }
}

/// Errors from handling an event.
#[derive(Debug)]
pub enum DispatchError {
    /// The lookup reported a failure.
    Lookup(LookupError),
    /// The lookup returned something other than a list.
    Malformed(MalformedResult),
    /// A submitted index is outside the current option list.
    StaleIndex { index: u64, len: usize },
    /// A submit payload could not be read as an option index.
    MalformedEvent(String),
    /// No record exists for the widget key.
    Unavailable(SessionUnavailable),
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lookup(err) => write!(f, "{err}"),
            Self::Malformed(err) => write!(f, "{err}"),
            Self::StaleIndex { index, len } => {
                write!(f, "submitted index {index} is outside {len} options")
            }
            Self::MalformedEvent(msg) => write!(f, "malformed submit: {msg}"),
            Self::Unavailable(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::Unavailable(err) => Some(err),
            Self::StaleIndex { .. } | Self::MalformedEvent(_) => None,
        }
    }
}

impl From<LookupError> for DispatchError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Malformed(inner) => Self::Malformed(inner),
            other => Self::Lookup(other),
        }
    }
}

impl From<SessionUnavailable> for DispatchError {
    fn from(err: SessionUnavailable) -> Self {
        Self::Unavailable(err)
    }
}

/// A search whose term is committed but whose results are outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    key: String,
    term: String,
    started_at: Duration,
}

impl PendingSearch {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Clock reading when the search began.
    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }
}

/// Why a deferred completion was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The record was removed while the lookup ran.
    SessionRemoved,
    /// A newer term was committed while the lookup ran.
    Superseded,
}

impl DiscardReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionRemoved => "session removed",
            Self::Superseded => "superseded",
        }
    }
}

/// What happened to a deferred completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCompletion {
    Applied { rerun: Rerun },
    Discarded { reason: DiscardReason },
}

/// Drives one widget's session record.
pub struct InteractionDispatcher<L, C = SystemClock> {
    config: SearchboxConfig,
    seed: SessionSeed,
    lookup: L,
    hooks: Hooks,
    rerun: RerunController<C>,
}

impl<L: Lookup> InteractionDispatcher<L, SystemClock> {
    /// Dispatcher on the system clock.
    #[must_use]
    pub fn new(config: SearchboxConfig, lookup: L) -> Self {
        Self::with_clock(config, lookup, SystemClock::new())
    }
}

impl<L: Lookup, C: Clock> InteractionDispatcher<L, C> {
    #[must_use]
    pub fn with_clock(config: SearchboxConfig, lookup: L, clock: C) -> Self {
        let rerun = RerunController::with_clock(clock)
            .with_min_execution_time(Duration::from_millis(config.min_execution_time_ms));
        let seed = config.seed();
        Self {
            config,
            seed,
            lookup,
            hooks: Hooks::default(),
            rerun,
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.rerun = self.rerun.with_capabilities(capabilities);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchboxConfig {
        &self.config
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.config.key
    }

    /// Seed used for creation and reset.
    #[must_use]
    pub fn seed(&self) -> &SessionSeed {
        &self.seed
    }

    #[must_use]
    pub fn rerun_controller(&self) -> &RerunController<C> {
        &self.rerun
    }

    /// Handle one cycle, creating the record first if needed.
    pub fn dispatch(
        &mut self,
        store: &mut SessionStore,
        event: Option<Interaction>,
    ) -> Result<Outcome, DispatchError> {
        store.get_or_init(&self.config.key, &self.seed);
        self.apply(store, event)
    }

    /// Handle one cycle against a record that must already exist.
    ///
    /// A missing record is not an error here: nothing changes, no rerun is
    /// requested and the configured default is reported.
    pub fn dispatch_existing(
        &mut self,
        store: &mut SessionStore,
        event: Option<Interaction>,
    ) -> Result<Outcome, DispatchError> {
        match self.apply(store, event) {
            Err(DispatchError::Unavailable(err)) => {
                instrument::record_unavailable(&err.key);
                Ok(Outcome::idle(self.seed.default.clone()))
            }
            other => other,
        }
    }

    /// Shorthand for `dispatch(store, Some(Interaction::Search(..)))`.
    pub fn search(
        &mut self,
        store: &mut SessionStore,
        term: impl Into<String>,
    ) -> Result<Outcome, DispatchError> {
        self.dispatch(store, Some(Interaction::Search(term.into())))
    }

    /// Shorthand for `dispatch(store, Some(Interaction::Submit(..)))`.
    pub fn submit(
        &mut self,
        store: &mut SessionStore,
        value: impl Into<Value>,
    ) -> Result<Outcome, DispatchError> {
        self.dispatch(store, Some(Interaction::Submit(value.into())))
    }

    /// Shorthand for `dispatch(store, Some(Interaction::Reset))`.
    pub fn reset(&mut self, store: &mut SessionStore) -> Result<Outcome, DispatchError> {
        self.dispatch(store, Some(Interaction::Reset))
    }

    fn apply(
        &mut self,
        store: &mut SessionStore,
        event: Option<Interaction>,
    ) -> Result<Outcome, DispatchError> {
        let interaction = event.as_ref().map_or("none", |e| e.kind().as_str());
        let _span = instrument::dispatch_span(&self.config.key, interaction);

        if !store.contains(&self.config.key) {
            return Err(SessionUnavailable {
                key: self.config.key.clone(),
            }
            .into());
        }

        match event {
            None => Ok(Outcome::idle(store.get(&self.config.key)?.result().clone())),
            Some(Interaction::Search(term)) => self.apply_search(store, &term),
            Some(Interaction::Submit(value)) => self.apply_submit(store, value),
            Some(Interaction::Reset) => Ok(self.apply_reset(store)),
        }
    }

    fn apply_search(&mut self, store: &mut SessionStore, term: &str) -> Result<Outcome, DispatchError> {
        let key = self.config.key.as_str();
        let session = store.get_mut(key)?;
        if !session.record_search(term) {
            instrument::record_dedup(key, term);
            return Ok(Outcome::idle(session.result().clone()));
        }
        if self.config.default_use_searchterm {
            session.commit_result(Value::from(term));
        }

        let started_at = self.rerun.now();
        let items = match self.lookup.lookup(term, &self.config.lookup_args) {
            Ok(items) => items,
            Err(err) => {
                instrument::record_lookup_failed(key, term, &err);
                return Err(err.into());
            }
        };
        let options = encode(items.as_deref());
        let results = options.len();
        session.set_options(options);
        instrument::record_lookup(key, term, results, micros(self.rerun.now(), started_at));

        let rerun = if self.config.rerun_on_update {
            self.rerun.request_paced(self.config.rerun_scope, started_at)
        } else {
            Rerun::None
        };
        Ok(Outcome {
            value: session.result().clone(),
            rerun,
            lookup_ran: true,
            submitted: false,
        })
    }

    fn apply_submit(&mut self, store: &mut SessionStore, value: Value) -> Result<Outcome, DispatchError> {
        let key = self.config.key.as_str();
        let session = store.get_mut(key)?;

        // Empty native list: the widget submitted a literal.
        let resolved = if session.options_native().is_empty() {
            value
        } else {
            let len = session.options_native().len();
            let index = value.as_u64().ok_or_else(|| {
                DispatchError::MalformedEvent(format!("expected an option index, got {value}"))
            })?;
            match usize::try_from(index).ok().and_then(|i| session.native_at(i)) {
                Some(native) => native.clone(),
                None => {
                    instrument::error_stale_index(key, index, len);
                    return Err(DispatchError::StaleIndex { index, len });
                }
            }
        };

        let submitted = session.commit_result(resolved);
        instrument::record_submit(key, submitted);
        if submitted {
            self.hooks.fire_submit(session.result());
        }
        let committed = session.result().clone();

        if !self.config.clear_on_submit {
            return Ok(Outcome {
                value: committed,
                rerun: Rerun::None,
                lookup_ran: false,
                submitted,
            });
        }

        store.reset(key, &self.seed.with_default(committed.clone()));
        Ok(Outcome {
            value: committed,
            rerun: self.rerun.request(self.config.rerun_scope),
            lookup_ran: false,
            submitted,
        })
    }

    fn apply_reset(&mut self, store: &mut SessionStore) -> Outcome {
        store.reset(&self.config.key, &self.seed);
        self.hooks.fire_reset();
        let rerun = if self.config.rerun_on_update {
            self.rerun.request(self.config.rerun_scope)
        } else {
            Rerun::None
        };
        Outcome {
            value: self.seed.default.clone(),
            rerun,
            lookup_ran: false,
            submitted: false,
        }
    }

    /// Commit `term` without running the lookup.
    ///
    /// Returns `None` when the term is unchanged.
    pub fn begin_search(&mut self, store: &mut SessionStore, term: &str) -> Option<PendingSearch> {
        let key = self.config.key.as_str();
        let _span = instrument::dispatch_span(key, "search");
        let session = store.get_or_init(key, &self.seed);
        if !session.record_search(term) {
            instrument::record_dedup(key, term);
            return None;
        }
        if self.config.default_use_searchterm {
            session.commit_result(Value::from(term));
        }
        Some(PendingSearch {
            key: key.to_owned(),
            term: term.to_owned(),
            started_at: self.rerun.now(),
        })
    }

    /// Run this dispatcher's lookup for a pending search.
    pub fn lookup_pending(&mut self, pending: &PendingSearch) -> LookupResult {
        self.lookup.lookup(&pending.term, &self.config.lookup_args)
    }

    /// Extra arguments for hosts that run the lookup elsewhere.
    #[must_use]
    pub fn lookup_args(&self) -> &LookupArgs {
        &self.config.lookup_args
    }

    /// Apply the results of a deferred lookup, unless they are stale.
    pub fn complete_search(
        &mut self,
        store: &mut SessionStore,
        pending: PendingSearch,
        items: Option<Vec<Item>>,
    ) -> SearchCompletion {
        let _span = instrument::dispatch_span(&pending.key, "search");
        let reason = match store.get_mut(&pending.key) {
            Err(_) => DiscardReason::SessionRemoved,
            Ok(session) if !session.is_current_search(&pending.term) => DiscardReason::Superseded,
            Ok(session) => {
                let options = encode(items.as_deref());
                let results = options.len();
                session.set_options(options);
                instrument::record_lookup(
                    &pending.key,
                    &pending.term,
                    results,
                    micros(self.rerun.now(), pending.started_at),
                );
                let rerun = if self.config.rerun_on_update {
                    self.rerun
                        .request_paced(self.config.rerun_scope, pending.started_at)
                } else {
                    Rerun::None
                };
                return SearchCompletion::Applied { rerun };
            }
        };
        instrument::record_discarded(&pending.key, &pending.term, reason.as_str());
        SearchCompletion::Discarded { reason }
    }
}

impl<L, C: std::fmt::Debug> std::fmt::Debug for InteractionDispatcher<L, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionDispatcher")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("rerun", &self.rerun)
            .finish_non_exhaustive()
    }
}

fn micros(now: Duration, since: Duration) -> u64 {
    u64::try_from(now.saturating_sub(since).as_micros()).unwrap_or(u64::MAX)
}
