#![forbid(unsafe_code)]

//! Searchbox core data types.
//!
//! This crate holds everything about the searchbox widget that is pure data:
//!
//! - [`Value`] - the erased native payload handed back to callers
//! - [`Item`] / [`option`] - lookup results and the codec that splits them
//!   into a display list and a native list
//! - [`SearchSession`] - the per-widget record that survives host cycles
//! - [`SessionStore`] - keyed create / reset / lookup of records
//! - [`Interaction`] - the events a widget reports back
//!
//! # Role in the workspace
//! `searchbox-core` has no notion of lookups, hooks, or reruns. The state
//! machine that drives these types lives in `searchbox-runtime`; the wire
//! contract with the widget lives in `searchbox-web`.

pub mod interaction;
pub mod option;
pub mod session;
pub mod store;
pub mod value;

pub use interaction::{Interaction, InteractionKind};
pub use option::{
    DisplayOption, EncodedOptions, Item, MalformedResult, encode, items_from_json, to_display,
    to_native,
};
pub use session::{RenderIdentity, SearchSession, SessionSeed};
pub use store::{SessionStore, SessionUnavailable, SharedSessionStore};
pub use value::{Value, display_label, from_value, to_value};
