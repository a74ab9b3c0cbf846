#![forbid(unsafe_code)]

//! Presentation options passed through to the widget.
//!
//! Nothing in this module is interpreted by the dispatcher. The types exist
//! so configuration files are checked and so the wire shape is stable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What search term the widget preloads after a submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAfterSubmit {
    /// Blank input.
    #[default]
    Disabled,
    /// Keep the term as typed.
    Current,
    /// Prefill with the chosen option's label.
    Option,
    /// Append the chosen label to the typed term.
    Concat,
}

impl EditAfterSubmit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Current => "current",
            Self::Option => "option",
            Self::Concat => "concat",
        }
    }

    /// Term to preload given what was typed and the chosen label.
    #[must_use]
    pub fn preload_term(self, typed: &str, chosen_label: &str) -> String {
        match self {
            Self::Disabled => String::new(),
            Self::Current => typed.to_owned(),
            Self::Option => chosen_label.to_owned(),
            Self::Concat => format!("{typed}{chosen_label}"),
        }
    }
}

/// Icon used for the clear button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearIcon {
    CircleUnfilled,
    CircleFilled,
    Cross,
}

/// When the clear button is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Clearable {
    Always,
    Never,
    AfterSubmit,
}

/// Clear button styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ClearIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearable: Option<Clearable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(
        default,
        rename = "stroke-width",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_width: Option<u32>,
}

/// Dropdown affordance styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownStyle {
    /// Flip the icon while the menu is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// Option row colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
}

/// Free-form CSS for the select parts, keyed by property name.
pub type CssMap = Map<String, Value>;

/// Menu and input styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchboxStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_list: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_value: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<OptionStyle>,
}

/// Nested style configuration for the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<CssMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<ClearStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown: Option<DropdownStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchbox: Option<SearchboxStyle>,
}
