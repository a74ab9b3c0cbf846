#![forbid(unsafe_code)]

//! Per-widget session record.
//!
//! A [`SearchSession`] is the only state that survives between host cycles.
//! Its fields are private so that the invariants below hold by construction:
//!
//! 1. `options_display.len() == options_native.len()`.
//! 2. `options_display[i].index == i`.
//! 3. `search` only moves forward through [`SearchSession::record_search`].
//! 4. `result` only changes through [`SearchSession::commit_result`].

use serde::{Deserialize, Serialize};

use crate::option::{DisplayOption, EncodedOptions, Item, encode};
use crate::value::Value;

/// Token that forces the widget to remount.
///
/// Every creation and every reset of a record gets a fresh generation, so a
/// stale widget instance keyed by an older identity can never deliver events
/// into the replacement record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderIdentity {
    key: String,
    generation: u64,
}

impl RenderIdentity {
    #[must_use]
    pub fn new(key: impl Into<String>, generation: u64) -> Self {
        Self {
            key: key.into(),
            generation,
        }
    }

    /// Widget key this identity belongs to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl core::fmt::Display for RenderIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}_react_{}", self.key, self.generation)
    }
}

/// Values a record is (re)created from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSeed {
    /// Initial committed result.
    pub default: Value,
    /// Initial search term.
    pub default_searchterm: String,
    /// Options shown before the first lookup.
    pub default_options: Option<Vec<Item>>,
}

impl SessionSeed {
    #[must_use]
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_searchterm(mut self, term: impl Into<String>) -> Self {
        self.default_searchterm = term.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<Item>) -> Self {
        self.default_options = Some(options);
        self
    }

    /// Same seed with a different default result.
    ///
    /// Used by clear-on-submit, where the cleared widget keeps reporting the
    /// last selection.
    #[must_use]
    pub fn with_default(&self, default: Value) -> Self {
        Self {
            default,
            default_searchterm: self.default_searchterm.clone(),
            default_options: self.default_options.clone(),
        }
    }
}

/// Persistent record for one widget key.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSession {
    result: Value,
    search: String,
    options_display: Vec<DisplayOption>,
    options_native: Vec<Value>,
    render_identity: RenderIdentity,
}

impl SearchSession {
    /// Build a fresh record from a seed.
    #[must_use]
    pub fn from_seed(key: &str, seed: &SessionSeed, generation: u64) -> Self {
        let EncodedOptions { display, native } = encode(seed.default_options.as_deref());
        Self {
            result: seed.default.clone(),
            search: seed.default_searchterm.clone(),
            options_display: display,
            options_native: native,
            render_identity: RenderIdentity::new(key, generation),
        }
    }

    /// Currently committed selection.
    #[must_use]
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Last search term dispatched to the lookup.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn options_display(&self) -> &[DisplayOption] {
        &self.options_display
    }

    #[must_use]
    pub fn options_native(&self) -> &[Value] {
        &self.options_native
    }

    #[must_use]
    pub fn render_identity(&self) -> &RenderIdentity {
        &self.render_identity
    }

    /// Whether `term` is exactly the last dispatched term.
    #[must_use]
    pub fn is_current_search(&self, term: &str) -> bool {
        self.search == term
    }

    /// Record a new dispatched term.
    ///
    /// Returns `false` (and changes nothing) when `term` equals the current
    /// term.
    pub fn record_search(&mut self, term: &str) -> bool {
        if self.is_current_search(term) {
            return false;
        }
        term.clone_into(&mut self.search);
        true
    }

    /// Replace the committed result. Returns whether the value changed.
    pub fn commit_result(&mut self, value: Value) -> bool {
        if self.result == value {
            return false;
        }
        self.result = value;
        true
    }

    /// Replace both option lists.
    pub fn set_options(&mut self, options: EncodedOptions) {
        debug_assert_eq!(options.display.len(), options.native.len());
        self.options_display = options.display;
        self.options_native = options.native;
    }

    /// Native value at `index`, if in bounds.
    #[must_use]
    pub fn native_at(&self, index: usize) -> Option<&Value> {
        self.options_native.get(index)
    }

    /// Display label at `index`, if in bounds.
    #[must_use]
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.options_display.get(index).map(|o| o.label.as_str())
    }
}
