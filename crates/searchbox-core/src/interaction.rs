#![forbid(unsafe_code)]

//! Interactions reported by the widget.

use crate::value::Value;

/// One event reported by the widget in a cycle.
///
/// "No event this cycle" is modeled as `Option<Interaction>::None`, never as
/// a falsy payload: `Submit(0)` is a real selection of the first option.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// The user typed a (debounced) search term.
    Search(String),
    /// The user picked an option (dense index) or submitted a literal value.
    Submit(Value),
    /// The user cleared the widget.
    Reset,
}

impl Interaction {
    /// Submit the option at `index`.
    #[must_use]
    pub fn select(index: usize) -> Self {
        Self::Submit(Value::from(index))
    }

    #[must_use]
    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::Search(_) => InteractionKind::Search,
            Self::Submit(_) => InteractionKind::Submit,
            Self::Reset => InteractionKind::Reset,
        }
    }
}

/// Discriminant of an [`Interaction`], as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Search,
    Submit,
    Reset,
}

impl InteractionKind {
    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "search" => Some(Self::Search),
            "submit" => Some(Self::Submit),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl core::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
