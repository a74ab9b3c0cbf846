#![forbid(unsafe_code)]

//! Native value payloads.
//!
//! Whatever a lookup hands back travels through the engine as an erased
//! [`Value`]. Rich caller types go in through [`to_value`] and come back out
//! through [`from_value`]; the engine itself only ever compares values for
//! equality and renders them to display labels.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use serde_json::Value;

/// Render a value the way the widget labels it.
///
/// Strings are shown verbatim (no quotes), integers as digits, floats keep
/// their fractional part (`4.0` stays `"4.0"`), `null` is `"None"`, and
/// booleans are `"True"` / `"False"`. Arrays and objects fall back to compact
/// JSON.
#[must_use]
pub fn display_label(value: &Value) -> String {
    match value {
        Value::Null => "None".to_owned(),
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Convert a caller type into a native value.
pub fn to_value<T: Serialize>(value: T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Convert a native value back into a caller type.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}
