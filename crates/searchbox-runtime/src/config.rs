#![forbid(unsafe_code)]

//! Per-widget configuration.
//!
//! [`SearchboxConfig`] carries every recognized widget option. It can be
//! built in code with the `with_*` setters or loaded from JSON (and TOML
//! with the `config-files` feature). Missing fields take their defaults.
//!
//! # Loading
//!
//! ```toml
//! key = "wikipedia"
//! placeholder = "Search Wikipedia"
//! default = "SOME DEFAULT"
//! rerun_scope = "fragment"
//!
//! [style_overrides.clear]
//! icon = "cross"
//! ```
//!
//! ```rust,ignore
//! let config = SearchboxConfig::from_toml_file("searchbox.toml")?;
//! let config = SearchboxConfig::from_json_str(json)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use searchbox_core::{Item, SessionSeed, Value};

use crate::lookup::LookupArgs;
use crate::rerun::RerunScope;
use crate::style::{EditAfterSubmit, StyleOverrides};

/// Placeholder shown in an empty widget.
pub const DEFAULT_PLACEHOLDER: &str = "Search ...";
/// Session key used when none is configured.
pub const DEFAULT_KEY: &str = "searchbox";
/// Widget-side debounce before a term is reported.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Recognized options for one searchbox widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchboxConfig {
    /// Identifies the session record. Must be unique per widget.
    pub key: String,
    /// Text shown in the empty input.
    pub placeholder: String,
    /// Label shown above the input.
    pub label: Option<String>,
    /// Result reported before anything is selected, and after a reset.
    pub default: Value,
    /// Initial search term.
    pub default_searchterm: String,
    /// Report the typed term as the result before anything is submitted.
    pub default_use_searchterm: bool,
    /// Options shown before the first lookup.
    pub default_options: Option<Vec<Item>>,
    /// Reset suggestions (keeping the selection) after every submit.
    pub clear_on_submit: bool,
    /// Request a rerun after each lookup and reset.
    pub rerun_on_update: bool,
    pub edit_after_submit: EditAfterSubmit,
    pub rerun_scope: RerunScope,
    pub style_overrides: Option<StyleOverrides>,
    /// Enforced by the widget, not here.
    pub debounce_ms: u64,
    /// Deprecated pacing floor for rerun signals.
    pub min_execution_time_ms: u64,
    /// Tooltip, only visible with a label.
    pub help: Option<String>,
    /// Extra named arguments forwarded to the lookup.
    pub lookup_args: LookupArgs,
}

impl Default for SearchboxConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            label: None,
            default: Value::Null,
            default_searchterm: String::new(),
            default_use_searchterm: false,
            default_options: None,
            clear_on_submit: false,
            rerun_on_update: true,
            edit_after_submit: EditAfterSubmit::Disabled,
            rerun_scope: RerunScope::App,
            style_overrides: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_execution_time_ms: 0,
            help: None,
            lookup_args: LookupArgs::new(),
        }
    }
}

impl SearchboxConfig {
    /// Default configuration under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    #[must_use]
    pub fn with_default_searchterm(mut self, term: impl Into<String>) -> Self {
        self.default_searchterm = term.into();
        self
    }

    #[must_use]
    pub fn with_default_use_searchterm(mut self, enabled: bool) -> Self {
        self.default_use_searchterm = enabled;
        self
    }

    #[must_use]
    pub fn with_default_options(mut self, options: Vec<Item>) -> Self {
        self.default_options = Some(options);
        self
    }

    #[must_use]
    pub fn with_clear_on_submit(mut self, enabled: bool) -> Self {
        self.clear_on_submit = enabled;
        self
    }

    #[must_use]
    pub fn with_rerun_on_update(mut self, enabled: bool) -> Self {
        self.rerun_on_update = enabled;
        self
    }

    #[must_use]
    pub fn with_edit_after_submit(mut self, mode: EditAfterSubmit) -> Self {
        self.edit_after_submit = mode;
        self
    }

    #[must_use]
    pub fn with_rerun_scope(mut self, scope: RerunScope) -> Self {
        self.rerun_scope = scope;
        self
    }

    #[must_use]
    pub fn with_style_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.style_overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_min_execution_time_ms(mut self, floor_ms: u64) -> Self {
        self.min_execution_time_ms = floor_ms;
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add one extra named argument for the lookup.
    #[must_use]
    pub fn with_lookup_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lookup_args.insert(name.into(), value.into());
        self
    }

    /// Seed for creating and resetting this widget's record.
    #[must_use]
    pub fn seed(&self) -> SessionSeed {
        SessionSeed {
            default: self.default.clone(),
            default_searchterm: self.default_searchterm.clone(),
            default_options: self.default_options.clone(),
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all options.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.key.trim().is_empty() {
            errors.push("key must not be empty".into());
        }

        if let Some(name) = self.lookup_args.keys().find(|name| name.is_empty()) {
            errors.push(format!("lookup_args contains an empty name: {name:?}"));
        }

        if self.help.is_some() && self.label.is_none() {
            tracing::debug!(
                target: "searchbox.config",
                key = %self.key,
                "help text is only shown with a label"
            );
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`SearchboxConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a config file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
