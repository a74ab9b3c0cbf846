#![forbid(unsafe_code)]

//! Option codec.
//!
//! A lookup returns a list of [`Item`]s. The widget only ever sees strings
//! and dense positions, while the caller wants its own values back. The codec
//! splits one item list into two index-aligned lists:
//!
//! ```text
//! items:    [ Bare(1), Labeled("Title B", 202) ]
//!               │             │
//! display:  [ {label:"1", index:0}, {label:"Title B", index:1} ]
//! native:   [ 1,                    202                        ]
//! ```
//!
//! Both sides always have the same length and `display[i].index == i`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{Value, display_label};

/// One result returned by a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A value that is labeled by its own display string.
    Bare(Value),
    /// A value with an explicit label.
    Labeled {
        /// Text shown by the widget.
        label: String,
        /// Value handed back to the caller on selection.
        value: Value,
    },
}

impl Item {
    /// Create a bare item.
    #[must_use]
    pub fn bare(value: impl Into<Value>) -> Self {
        Self::Bare(value.into())
    }

    /// Create a labeled item. Non-string labels are rendered with
    /// [`display_label`].
    #[must_use]
    pub fn labeled(label: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::Labeled {
            label: display_label(&label.into()),
            value: value.into(),
        }
    }

    /// Label shown by the widget.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Bare(value) => display_label(value),
            Self::Labeled { label, .. } => label.clone(),
        }
    }

    /// Value handed back to the caller.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Bare(value) | Self::Labeled { value, .. } => value,
        }
    }

    /// Consume the item, keeping only its native value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Bare(value) | Self::Labeled { value, .. } => value,
        }
    }

    /// Interpret a single JSON element as an item.
    ///
    /// `{"label": .., "value": ..}` objects and two-element arrays whose first
    /// element is a string are labeled; everything else is bare.
    ///
    /// JSON cannot tell a pair from a native array, so `[1, "one"]` stays a
    /// bare array value. A pair with a non-string label must use the object
    /// form. A native object with exactly the keys `label` and `value` is
    /// read as a labeled item; wrap such values in the object form.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map)
                if map.len() == 2 && map.contains_key("label") && map.contains_key("value") =>
            {
                let label = map.remove("label").unwrap_or(Value::Null);
                let value = map.remove("value").unwrap_or(Value::Null);
                Self::labeled(label, value)
            }
            Value::Array(mut pair) if pair.len() == 2 && pair[0].is_string() => {
                let value = pair.pop().unwrap_or(Value::Null);
                let label = pair.pop().unwrap_or(Value::Null);
                Self::labeled(label, value)
            }
            other => Self::Bare(other),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Self::Bare(value)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct LabeledRef<'a> {
            label: &'a str,
            value: &'a Value,
        }

        match self {
            Self::Bare(value) => value.serialize(serializer),
            Self::Labeled { label, value } => LabeledRef { label, value }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

/// One entry of the display list.
///
/// On the wire the index is called `value`, matching what the widget submits
/// back when the option is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOption {
    /// Text shown by the widget.
    pub label: String,
    /// Dense position into the native list.
    #[serde(rename = "value")]
    pub index: usize,
}

/// Display and native lists produced from one item list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedOptions {
    /// What the widget shows.
    pub display: Vec<DisplayOption>,
    /// What submits resolve to, index-aligned with `display`.
    pub native: Vec<Value>,
}

impl EncodedOptions {
    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.native.len()
    }

    /// True when there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.native.is_empty()
    }
}

/// Build the display list.
#[must_use]
pub fn to_display(items: &[Item]) -> Vec<DisplayOption> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| DisplayOption {
            label: item.label(),
            index,
        })
        .collect()
}

/// Build the native list.
#[must_use]
pub fn to_native(items: &[Item]) -> Vec<Value> {
    items.iter().map(|item| item.value().clone()).collect()
}

/// Build both lists at once. A missing item list encodes as empty.
#[must_use]
pub fn encode(items: Option<&[Item]>) -> EncodedOptions {
    let items = items.unwrap_or_default();
    EncodedOptions {
        display: to_display(items),
        native: to_native(items),
    }
}

/// A lookup produced something that is neither a list nor `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedResult {
    /// JSON type name of what was returned.
    pub found: &'static str,
}

impl core::fmt::Display for MalformedResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "lookup must return a list of items or null, got {}",
            self.found
        )
    }
}

impl std::error::Error for MalformedResult {}

/// Interpret a JSON lookup result as an item list.
///
/// `null` is an empty list. Anything other than an array or `null` is
/// rejected. Elements are read with [`Item::from_json`].
pub fn items_from_json(value: Value) -> Result<Vec<Item>, MalformedResult> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(elements) => Ok(elements.into_iter().map(Item::from_json).collect()),
        Value::Bool(_) => Err(MalformedResult { found: "boolean" }),
        Value::Number(_) => Err(MalformedResult { found: "number" }),
        Value::String(_) => Err(MalformedResult { found: "string" }),
        Value::Object(_) => Err(MalformedResult { found: "object" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opt(label: &str, index: usize) -> DisplayOption {
        DisplayOption {
            label: label.to_owned(),
            index,
        }
    }

    fn single_values() -> Vec<Item> {
        vec![
            Item::bare(1),
            Item::bare(2),
            Item::bare("three"),
            Item::bare(4.0),
        ]
    }

    fn pairs() -> Vec<Item> {
        vec![
            Item::labeled(1, "one"),
            Item::labeled(2, "two"),
            Item::labeled("3", "three"),
        ]
    }

    fn mixed() -> Vec<Item> {
        vec![
            Item::bare(1),
            Item::labeled(2, "two"),
            Item::bare(3),
            Item::labeled("4", "four"),
        ]
    }

    #[test]
    fn native_single_values() {
        assert_eq!(
            to_native(&single_values()),
            vec![json!(1), json!(2), json!("three"), json!(4.0)]
        );
    }

    #[test]
    fn native_pairs() {
        assert_eq!(
            to_native(&pairs()),
            vec![json!("one"), json!("two"), json!("three")]
        );
    }

    #[test]
    fn native_mixed() {
        assert_eq!(
            to_native(&mixed()),
            vec![json!(1), json!("two"), json!(3), json!("four")]
        );
    }

    #[test]
    fn display_single_values() {
        assert_eq!(
            to_display(&single_values()),
            vec![opt("1", 0), opt("2", 1), opt("three", 2), opt("4.0", 3)]
        );
    }

    #[test]
    fn display_pairs() {
        assert_eq!(
            to_display(&pairs()),
            vec![opt("1", 0), opt("2", 1), opt("3", 2)]
        );
    }

    #[test]
    fn display_mixed() {
        assert_eq!(
            to_display(&mixed()),
            vec![opt("1", 0), opt("2", 1), opt("3", 2), opt("4", 3)]
        );
    }

    #[test]
    fn empty_and_missing() {
        assert!(to_display(&[]).is_empty());
        assert!(to_native(&[]).is_empty());
        let encoded = encode(None);
        assert!(encoded.is_empty());
        assert!(encoded.display.is_empty());
    }

    #[test]
    fn encode_keeps_lists_aligned() {
        let items = mixed();
        let encoded = encode(Some(&items));
        assert_eq!(encoded.len(), 4);
        assert_eq!(encoded.display.len(), encoded.native.len());
    }

    #[test]
    fn display_option_wire_shape() {
        let wire = serde_json::to_value(opt("Title A", 0)).unwrap();
        assert_eq!(wire, json!({"label": "Title A", "value": 0}));
    }

    #[test]
    fn items_from_null_is_empty() {
        assert_eq!(items_from_json(Value::Null).unwrap(), Vec::new());
    }

    #[test]
    fn items_from_array_detects_pairs() {
        let items = items_from_json(json!([
            "a",
            ["Title A", 101],
            {"label": "Title B", "value": 202},
            [1, 2],
            {"id": 3}
        ]))
        .unwrap();
        assert_eq!(items[0], Item::bare("a"));
        assert_eq!(items[1], Item::labeled("Title A", 101));
        assert_eq!(items[2], Item::labeled("Title B", 202));
        assert_eq!(items[3], Item::bare(json!([1, 2])));
        assert_eq!(items[4], Item::bare(json!({"id": 3})));
    }

    #[test]
    fn numeric_labels_need_the_object_form() {
        let items = items_from_json(json!([
            [1, "one"],
            {"label": 2, "value": "two"},
            {"label": {"label": 3, "value": "three"}, "value": {"label": "x", "value": 1}}
        ]))
        .unwrap();
        assert_eq!(items[0], Item::bare(json!([1, "one"])));
        assert_eq!(items[0].label(), r#"[1,"one"]"#);
        assert_eq!(items[1], Item::labeled(2, "two"));
        assert_eq!(items[1].label(), "2");
        assert_eq!(items[2].value(), &json!({"label": "x", "value": 1}));
    }

    #[test]
    fn items_from_scalar_is_malformed() {
        let err = items_from_json(json!("oops")).unwrap_err();
        assert_eq!(err.found, "string");
        assert!(err.to_string().contains("string"));
        assert_eq!(
            items_from_json(json!({"a": 1})).unwrap_err().found,
            "object"
        );
    }

    #[test]
    fn item_serde_shapes() {
        let items = vec![Item::bare(5), Item::labeled("five", 5)];
        let wire = serde_json::to_value(&items).unwrap();
        assert_eq!(wire, json!([5, {"label": "five", "value": 5}]));
        let back: Vec<Item> = serde_json::from_value(wire).unwrap();
        assert_eq!(back, items);
    }
}
