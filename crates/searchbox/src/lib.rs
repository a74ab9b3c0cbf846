#![forbid(unsafe_code)]

//! Searchbox public facade crate.
//!
//! An autocomplete search widget whose suggestions come from a caller
//! function and whose selection survives the host's re-render cycles. This
//! crate re-exports the stable surface of the workspace crates and offers a
//! prelude for day-to-day use.
//!
//! ```rust,ignore
//! use searchbox::prelude::*;
//!
//! let mut store = SessionStore::new();
//! let mut widget = searchbox(
//!     SearchboxConfig::new("wiki").with_placeholder("Search Wikipedia"),
//!     from_fn(|term| Some(vec![Item::bare(format!("{term}!"))])),
//! );
//! let rendered = widget.render(&mut store, inbound_json)?;
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use searchbox_core::{
    DisplayOption, Interaction, InteractionKind, Item, MalformedResult, RenderIdentity,
    SearchSession, SessionSeed, SessionStore, SessionUnavailable, SharedSessionStore, Value,
    display_label, from_value, to_value,
};

// --- Runtime re-exports ----------------------------------------------------

pub use searchbox_runtime::{
    Clock, ConfigError, DispatchError, EditAfterSubmit, Hooks, HostCapabilities,
    InteractionDispatcher, JsonLookup, Lookup, LookupArgs, LookupError, LookupResult, ManualClock,
    Outcome, Rerun, RerunScope, SearchboxConfig, StyleOverrides, SystemClock, from_fn,
};

// --- Web re-exports --------------------------------------------------------

pub use searchbox_web::{
    BridgeError, BridgeProps, EventParseError, Rendered, SearchboxComponent, parse_bridge_event,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for searchbox hosts.
#[derive(Debug)]
pub enum Error {
    /// Widget configuration could not be loaded.
    Config(ConfigError),
    /// An event was rejected.
    Dispatch(DispatchError),
    /// The widget's report or props could not be translated.
    Bridge(BridgeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Dispatch(err) => write!(f, "{err}"),
            Self::Bridge(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Dispatch(err) => Some(err),
            Self::Bridge(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DispatchError> for Error {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<BridgeError> for Error {
    fn from(err: BridgeError) -> Self {
        Self::Bridge(err)
    }
}

/// Standard result type for searchbox APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a widget on the system clock.
#[must_use]
pub fn searchbox<L: Lookup>(config: SearchboxConfig, lookup: L) -> SearchboxComponent<L> {
    SearchboxComponent::new(config, lookup)
}

/// Build a widget with hooks on the system clock.
#[must_use]
pub fn searchbox_with_hooks<L: Lookup>(
    config: SearchboxConfig,
    lookup: L,
    hooks: Hooks,
) -> SearchboxComponent<L> {
    SearchboxComponent::from_dispatcher(InteractionDispatcher::new(config, lookup).with_hooks(hooks))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BridgeProps, Error, Hooks, Interaction, Item, Lookup, LookupArgs, LookupResult, Rendered,
        Rerun, RerunScope, Result, SearchboxComponent, SearchboxConfig, SessionStore, Value,
        from_fn, searchbox, searchbox_with_hooks,
    };

    pub use crate::{core, runtime, web};
}

pub use searchbox_core as core;
pub use searchbox_runtime as runtime;
pub use searchbox_web as web;
