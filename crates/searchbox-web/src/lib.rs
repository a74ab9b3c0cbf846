#![forbid(unsafe_code)]

//! `searchbox-web` is the wire contract between the engine and the browser
//! widget.
//!
//! - **Outbound**: [`BridgeProps`], serialized with the widget's camelCase
//!   field names.
//! - **Inbound**: [`parse_bridge_event`] turns the widget's report into an
//!   [`Interaction`](searchbox_core::Interaction).
//! - **Cycle**: [`SearchboxComponent`] ties both ends to an
//!   [`InteractionDispatcher`](searchbox_runtime::InteractionDispatcher).
//!
//! This crate does not bind to any JS runtime. Hosts move the JSON text
//! across whatever boundary they have.

pub mod component;
pub mod event;
pub mod props;

pub use component::{Rendered, SearchboxComponent};
pub use event::{EventParseError, encode_bridge_event, parse_bridge_event, parse_bridge_value};
pub use props::BridgeProps;

use searchbox_runtime::DispatchError;

/// Errors from one component cycle.
#[derive(Debug)]
pub enum BridgeError {
    /// The widget's report could not be parsed.
    Event(EventParseError),
    /// The event was rejected by the dispatcher.
    Dispatch(DispatchError),
    /// Props could not be encoded or decoded.
    Encode(String),
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Event(err) => write!(f, "bad widget event: {err}"),
            Self::Dispatch(err) => write!(f, "dispatch failed: {err}"),
            Self::Encode(msg) => write!(f, "props encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Event(err) => Some(err),
            Self::Dispatch(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

impl From<EventParseError> for BridgeError {
    fn from(err: EventParseError) -> Self {
        Self::Event(err)
    }
}

impl From<DispatchError> for BridgeError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}
