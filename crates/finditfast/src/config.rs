//! Widget configuration
//!
//! [`Options`] mirrors the plugin's JSON option layout and deserializes with
//! every field optional, so a partial document deep-merges over the
//! defaults. [`WidgetConfig`] is the validated, immutable form shared by
//! every instance created from one [`crate::Widget`].

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::hooks::Hooks;
use crate::source::QuerySource;

/// Default debounce interval
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Data backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Plain list of strings
    Array,
    /// List of objects with a display field
    ObjectList,
    /// Remote JSON endpoint
    Remote,
}

impl DataKind {
    /// Parse a kind name; `json` and `url` are accepted as aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Some(Self::Array),
            "object-list" | "json" => Some(Self::ObjectList),
            "remote" | "url" => Some(Self::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Array => "array",
            Self::ObjectList => "object-list",
            Self::Remote => "remote",
        })
    }
}

/// User-facing options, camelCase as in the plugin's option object
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub data_config: DataOptions,
    /// Class added to the document element while widgets are attached
    pub init_class: String,
    pub templates: TemplateOptions,
    pub aria_config: AriaOptions,
    /// Host callbacks; not part of the JSON document
    #[serde(skip)]
    pub hooks: Hooks,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_config: DataOptions::default(),
            init_class: "findItFast-js".into(),
            templates: TemplateOptions::default(),
            aria_config: AriaOptions::default(),
            hooks: Hooks::default(),
        }
    }
}

impl Options {
    /// Parse a JSON options document over the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataOptions {
    /// `array`, `object-list` (`json`) or `remote` (`url`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Inline data, or the endpoint URL for remote sources
    pub src: Option<serde_json::Value>,
    /// Field shown for each record
    pub value_name: Option<String>,
    /// Field holding each record's link target
    pub link_name: Option<String>,
    /// Truncate results to this many entries when positive
    pub max_items: Option<i64>,
    /// Debounce interval in milliseconds
    #[serde(alias = "debounceMs")]
    pub timer: u64,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            kind: "object-list".into(),
            src: None,
            value_name: None,
            link_name: None,
            max_items: None,
            timer: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateOptions {
    pub form: FormOptions,
    pub list_items: ListItemOptions,
}

/// Strings and attributes of the generated form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormOptions {
    pub method: String,
    pub action: String,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub input_name: String,
    pub clear_search_text: String,
    pub submit_text: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            method: "get".into(),
            action: String::new(),
            name: "findItFast-form".into(),
            label: "Search".into(),
            placeholder: String::new(),
            input_name: "findItFast-input".into(),
            clear_search_text: "Clear search".into(),
            submit_text: "Submit".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListItemOptions {
    /// Render entries as links that navigate on activation
    pub include_links: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AriaOptions {
    pub sr_hidden_class: String,
    pub include_live_region: bool,
    pub live_msg: Messages,
}

impl Default for AriaOptions {
    fn default() -> Self {
        Self {
            sr_hidden_class: "sr-only".into(),
            include_live_region: false,
            live_msg: Messages::default(),
        }
    }
}

/// Status messages keyed by result count
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub none: String,
    pub one: String,
    pub multiple: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            none: "No suggestions found.".into(),
            one: "One suggestion found. Use up and down keys to navigate.".into(),
            multiple: "Multiple suggestions found. Use up and down keys to navigate.".into(),
        }
    }
}

impl Messages {
    /// Message for a result count
    pub fn for_count(&self, count: usize) -> &str {
        match count {
            0 => self.none.as_str(),
            1 => self.one.as_str(),
            _ => self.multiple.as_str(),
        }
    }
}

/// Validated configuration shared by all instances of one widget
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub source: QuerySource,
    pub debounce: Duration,
    pub form: FormOptions,
    pub messages: Messages,
    pub include_links: bool,
    pub live_region: bool,
    pub sr_hidden_class: String,
    pub init_class: String,
    pub hooks: Hooks,
}

impl WidgetConfig {
    /// Validate options and resolve them into a config
    pub fn resolve(options: Options) -> Result<Self, ConfigError> {
        let Options { data_config, init_class, templates, aria_config, hooks } = options;

        if templates.form.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if templates.form.input_name.trim().is_empty() {
            return Err(ConfigError::MissingInputName);
        }

        let source = QuerySource::from_options(&data_config)?;

        Ok(Self {
            source,
            debounce: Duration::from_millis(data_config.timer),
            form: templates.form,
            messages: aria_config.live_msg,
            include_links: templates.list_items.include_links,
            live_region: aria_config.include_live_region,
            sr_hidden_class: aria_config.sr_hidden_class,
            init_class,
            hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.data_config.kind, "object-list");
        assert_eq!(opts.data_config.timer, 500);
        assert_eq!(opts.data_config.max_items, None);
        assert!(!opts.aria_config.include_live_region);
        assert!(!opts.templates.list_items.include_links);
        assert_eq!(opts.templates.form.name, "findItFast-form");
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let opts = Options::from_json(r#"{
            "dataConfig": { "type": "array", "src": ["a"], "maxItems": 3 },
            "templates": { "form": { "label": "Find a fruit" } },
            "ariaConfig": { "liveMsg": { "none": "Nothing." } }
        }"#).unwrap();

        assert_eq!(opts.data_config.kind, "array");
        assert_eq!(opts.data_config.max_items, Some(3));
        assert_eq!(opts.data_config.timer, 500);
        assert_eq!(opts.templates.form.label, "Find a fruit");
        assert_eq!(opts.templates.form.input_name, "findItFast-input");
        assert_eq!(opts.aria_config.live_msg.none, "Nothing.");
        assert_eq!(opts.aria_config.live_msg.one, Messages::default().one);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Options::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(DataKind::parse("json"), Some(DataKind::ObjectList));
        assert_eq!(DataKind::parse("URL"), Some(DataKind::Remote));
        assert_eq!(DataKind::parse("array"), Some(DataKind::Array));
        assert_eq!(DataKind::parse("csv"), None);
    }

    #[test]
    fn test_message_for_count() {
        let m = Messages::default();
        assert_eq!(m.for_count(0), m.none);
        assert_eq!(m.for_count(1), m.one);
        assert_eq!(m.for_count(2), m.multiple);
        assert_eq!(m.for_count(usize::MAX), m.multiple);
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut opts = Options::default();
        opts.templates.form.name = "  ".into();
        assert_eq!(WidgetConfig::resolve(opts).unwrap_err(), ConfigError::MissingName);
    }

    #[test]
    fn test_invalid_kind_rejected() {
        let mut opts = Options::default();
        opts.data_config.kind = "xml".into();
        assert_eq!(
            WidgetConfig::resolve(opts).unwrap_err(),
            ConfigError::InvalidDataKind("xml".into())
        );
    }
}
