#![forbid(unsafe_code)]

//! Inbound widget events.
//!
//! The widget reports at most one event per cycle as a JSON object:
//!
//! ```json
//! {"interaction": "search", "value": "ab"}
//! {"interaction": "submit", "value": 3}
//! {"interaction": "reset",  "value": null}
//! ```
//!
//! A bare `null` means nothing happened this cycle.

use serde::Deserialize;

use searchbox_core::{Interaction, InteractionKind, Value};

/// Errors from parsing an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    /// Malformed JSON or wrong envelope shape.
    Json(String),
    /// `interaction` names no known event.
    UnknownInteraction(String),
    /// The payload does not fit the interaction.
    InvalidValue {
        interaction: InteractionKind,
        found: &'static str,
    },
}

impl core::fmt::Display for EventParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::UnknownInteraction(name) => write!(f, "unknown interaction: {name}"),
            Self::InvalidValue { interaction, found } => {
                write!(f, "invalid {interaction} value: {found}")
            }
        }
    }
}

impl std::error::Error for EventParseError {}

/// Wire envelope.
#[derive(Debug, Deserialize)]
struct RawEvent {
    interaction: String,
    #[serde(default)]
    value: Value,
}

/// Parse an inbound event from its JSON text.
///
/// Returns `Ok(None)` for `null`.
pub fn parse_bridge_event(json: &str) -> Result<Option<Interaction>, EventParseError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| EventParseError::Json(e.to_string()))?;
    parse_bridge_value(value)
}

/// Parse an inbound event that was already decoded to JSON.
pub fn parse_bridge_value(value: Value) -> Result<Option<Interaction>, EventParseError> {
    if value.is_null() {
        return Ok(None);
    }
    let raw: RawEvent =
        serde_json::from_value(value).map_err(|e| EventParseError::Json(e.to_string()))?;
    let kind = InteractionKind::from_wire(&raw.interaction)
        .ok_or(EventParseError::UnknownInteraction(raw.interaction))?;

    let interaction = match kind {
        InteractionKind::Search => match raw.value {
            Value::String(term) => Interaction::Search(term),
            other => {
                return Err(EventParseError::InvalidValue {
                    interaction: kind,
                    found: json_type(&other),
                });
            }
        },
        InteractionKind::Submit => Interaction::Submit(raw.value),
        InteractionKind::Reset => Interaction::Reset,
    };
    Ok(Some(interaction))
}

/// Encode an event the way the widget sends it.
#[must_use]
pub fn encode_bridge_event(event: Option<&Interaction>) -> Value {
    let Some(event) = event else {
        return Value::Null;
    };
    let value = match event {
        Interaction::Search(term) => Value::from(term.as_str()),
        Interaction::Submit(value) => value.clone(),
        Interaction::Reset => Value::Null,
    };
    serde_json::json!({
        "interaction": event.kind().as_str(),
        "value": value,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_is_no_event() {
        assert_eq!(parse_bridge_event("null").unwrap(), None);
    }

    #[test]
    fn search_event() {
        let ev = parse_bridge_event(r#"{"interaction":"search","value":"ab"}"#).unwrap();
        assert_eq!(ev, Some(Interaction::Search("ab".into())));
    }

    #[test]
    fn submit_index_zero() {
        let ev = parse_bridge_event(r#"{"interaction":"submit","value":0}"#).unwrap();
        assert_eq!(ev, Some(Interaction::select(0)));
    }

    #[test]
    fn submit_literal_text() {
        let ev = parse_bridge_event(r#"{"interaction":"submit","value":"free text"}"#).unwrap();
        assert_eq!(ev, Some(Interaction::Submit(json!("free text"))));
    }

    #[test]
    fn reset_ignores_value() {
        for raw in [
            r#"{"interaction":"reset","value":null}"#,
            r#"{"interaction":"reset"}"#,
            r#"{"interaction":"reset","value":"x"}"#,
        ] {
            assert_eq!(parse_bridge_event(raw).unwrap(), Some(Interaction::Reset));
        }
    }

    #[test]
    fn search_requires_string() {
        let err = parse_bridge_event(r#"{"interaction":"search","value":5}"#).unwrap_err();
        assert_eq!(
            err,
            EventParseError::InvalidValue {
                interaction: InteractionKind::Search,
                found: "number"
            }
        );
        assert_eq!(err.to_string(), "invalid search value: number");
    }

    #[test]
    fn unknown_interaction() {
        let err = parse_bridge_event(r#"{"interaction":"hover","value":1}"#).unwrap_err();
        assert_eq!(err, EventParseError::UnknownInteraction("hover".into()));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            parse_bridge_event("{oops").unwrap_err(),
            EventParseError::Json(_)
        ));
        assert!(matches!(
            parse_bridge_event("[1,2]").unwrap_err(),
            EventParseError::Json(_)
        ));
        assert!(matches!(
            parse_bridge_event(r#"{"value":1}"#).unwrap_err(),
            EventParseError::Json(_)
        ));
    }

    #[test]
    fn encode_matches_widget_shape() {
        assert_eq!(encode_bridge_event(None), Value::Null);
        assert_eq!(
            encode_bridge_event(Some(&Interaction::Search("q".into()))),
            json!({"interaction": "search", "value": "q"})
        );
        assert_eq!(
            encode_bridge_event(Some(&Interaction::Reset)),
            json!({"interaction": "reset", "value": null})
        );
    }

    #[test]
    fn encoded_events_parse_back() {
        for ev in [
            Interaction::Search(String::new()),
            Interaction::select(4),
            Interaction::Submit(json!({"id": 7})),
            Interaction::Reset,
        ] {
            let wire = encode_bridge_event(Some(&ev));
            assert_eq!(parse_bridge_value(wire).unwrap(), Some(ev));
        }
    }
}
