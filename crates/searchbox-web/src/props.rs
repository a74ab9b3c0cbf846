#![forbid(unsafe_code)]

//! Outbound widget props.

use serde::{Deserialize, Serialize};

use searchbox_core::{DisplayOption, SearchSession};
use searchbox_runtime::{EditAfterSubmit, SearchboxConfig, StyleOverrides};

use crate::BridgeError;

/// Everything the widget needs to draw one cycle.
///
/// Field names follow the widget's camelCase props. `key` is the render
/// identity: a new value makes the widget drop its local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeProps {
    pub options: Vec<DisplayOption>,
    pub clear_on_submit: bool,
    pub placeholder: String,
    pub label: Option<String>,
    pub edit_after_submit: EditAfterSubmit,
    pub style_overrides: Option<StyleOverrides>,
    pub debounce_ms: u64,
    pub default_searchterm: String,
    pub help: Option<String>,
    pub key: String,
}

impl BridgeProps {
    /// Props for `session` under `config`.
    #[must_use]
    pub fn from_session(config: &SearchboxConfig, session: &SearchSession) -> Self {
        Self {
            options: session.options_display().to_vec(),
            clear_on_submit: config.clear_on_submit,
            placeholder: config.placeholder.clone(),
            label: config.label.clone(),
            edit_after_submit: config.edit_after_submit,
            style_overrides: config.style_overrides.clone(),
            debounce_ms: config.debounce_ms,
            default_searchterm: config.default_searchterm.clone(),
            help: config.help.clone(),
            key: session.render_identity().to_string(),
        }
    }

    /// Serialize to the widget's JSON text.
    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Encode(e.to_string()))
    }

    /// Parse props back from JSON text.
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(json).map_err(|e| BridgeError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use searchbox_core::{Item, SessionStore};
    use searchbox_runtime::style::{ClearIcon, ClearStyle};
    use serde_json::json;

    #[test]
    fn props_wire_shape() {
        let config = SearchboxConfig::new("wiki")
            .with_label("Wikipedia")
            .with_default_options(vec![Item::bare("rust"), Item::labeled("Go", "golang")])
            .with_edit_after_submit(EditAfterSubmit::Option);
        let mut store = SessionStore::new();
        let session = store.get_or_init("wiki", &config.seed());
        let props = BridgeProps::from_session(&config, session);

        let wire: serde_json::Value = serde_json::from_str(&props.to_json().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "options": [{"label": "rust", "value": 0}, {"label": "Go", "value": 1}],
                "clearOnSubmit": false,
                "placeholder": "Search ...",
                "label": "Wikipedia",
                "editAfterSubmit": "option",
                "styleOverrides": null,
                "debounceMs": 150,
                "defaultSearchterm": "",
                "help": null,
                "key": "wiki_react_1"
            })
        );
    }

    #[test]
    fn style_overrides_pass_through() {
        let overrides = StyleOverrides {
            clear: Some(ClearStyle {
                icon: Some(ClearIcon::Cross),
                ..ClearStyle::default()
            }),
            ..StyleOverrides::default()
        };
        let config = SearchboxConfig::new("s").with_style_overrides(overrides);
        let mut store = SessionStore::new();
        let session = store.get_or_init("s", &config.seed());
        let props = BridgeProps::from_session(&config, session);
        let json = props.to_json().unwrap();
        assert!(json.contains(r#""styleOverrides":{"clear":{"icon":"cross"}}"#));
        assert_eq!(BridgeProps::from_json(&json).unwrap(), props);
    }
}
