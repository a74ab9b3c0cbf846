#![forbid(unsafe_code)]

//! Searchbox Runtime
//!
//! This crate turns widget interactions into session updates and rerun
//! signals.
//!
//! # Key Components
//!
//! - [`InteractionDispatcher`] - search / submit / reset state machine
//! - [`Lookup`] - caller-supplied suggestion function
//! - [`SearchboxConfig`] - per-widget options, loadable from JSON or TOML
//! - [`Hooks`] - reset and submit callbacks
//! - [`RerunController`] / [`Rerun`] - explicit re-render requests
//! - [`Clock`] - monotonic time for pacing, real or manual
//!
//! # Role in the workspace
//! `searchbox-runtime` sits between the pure data in `searchbox-core` and
//! the wire contract in `searchbox-web`. It owns every side effect of a
//! cycle: calling the lookup, firing hooks, and deciding whether the host
//! should rerun.

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod hooks;
pub mod instrument;
pub mod lookup;
pub mod rerun;
pub mod style;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SearchboxConfig};
pub use dispatcher::{
    DiscardReason, DispatchError, InteractionDispatcher, Outcome, PendingSearch, SearchCompletion,
};
pub use hooks::Hooks;
pub use lookup::{FnLookup, JsonLookup, Lookup, LookupArgs, LookupError, LookupResult, from_fn};
pub use rerun::{HostCapabilities, Rerun, RerunController, RerunScope};
pub use style::{EditAfterSubmit, StyleOverrides};
