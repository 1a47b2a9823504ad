//! Classifier configuration.
//!
//! Resolved once per pipeline instantiation, either directly through the
//! builder methods or from the host's loosely-typed settings mapping.
//! Settings parsing is lenient: the host delivers checkbox values as
//! bools/ints/strings and folder or category selections as ints, numeric
//! strings, or one-element arrays, all falling back to defaults on nonsense.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

/// Model used when the host configures none.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Cap on extracted text sent to the model, in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 4000;

/// Advisory cap on generated document names, in characters.
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 100;

/// Configuration for one classification run.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Master enablement flag
    pub enabled: bool,

    /// Chat completion endpoint URL; empty disables classification
    pub endpoint: String,

    /// API key; empty sends no auth header
    pub api_key: String,

    /// Model name or Azure deployment name
    pub model: String,

    /// API version (Azure only)
    pub api_version: Option<String>,

    /// Folder subtree outside of which classification is skipped
    pub limit_folder: Option<u32>,

    /// Category assigned to every classified document, never offered to the
    /// model
    pub default_category: Option<u32>,

    /// Advisory length limit passed to the model for generated names
    pub max_title_length: usize,

    /// Cap on extracted text sent to the model, in characters
    pub max_text_length: usize,

    /// Restrict model keywords to the host's configured keyword lists
    pub restrict_keywords: bool,

    /// Extra instructions appended to the system prompt
    pub additional_prompt: String,

    /// Path to the pdftotext binary; `None` uses the fixed default
    pub pdftotext_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_version: None,
            limit_folder: None,
            default_category: None,
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            restrict_keywords: false,
            additional_prompt: String::new(),
            pdftotext_path: None,
        }
    }
}

impl ClassifierConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable classification.
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Set the completion endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model or deployment name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API version (Azure only).
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Limit classification to a folder subtree.
    pub fn with_limit_folder(mut self, folder_id: u32) -> Self {
        self.limit_folder = Some(folder_id);
        self
    }

    /// Set the default category.
    pub fn with_default_category(mut self, category_id: u32) -> Self {
        self.default_category = Some(category_id);
        self
    }

    /// Set the advisory title length limit.
    pub fn with_max_title_length(mut self, length: usize) -> Self {
        self.max_title_length = length;
        self
    }

    /// Set the extracted-text cap.
    pub fn with_max_text_length(mut self, length: usize) -> Self {
        self.max_text_length = length;
        self
    }

    /// Restrict keywords to the host's configured lists.
    pub fn restrict_keywords(mut self) -> Self {
        self.restrict_keywords = true;
        self
    }

    /// Append extra instructions to the system prompt.
    pub fn with_additional_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.additional_prompt = prompt.into();
        self
    }

    /// Set the pdftotext binary path.
    pub fn with_pdftotext_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdftotext_path = Some(path.into());
        self
    }

    /// Resolve configuration from the host's settings mapping.
    pub fn from_settings(settings: &HashMap<String, Value>) -> Self {
        let defaults = Self::default();

        Self {
            enabled: bool_setting(settings.get("llm_enabled")),
            endpoint: string_setting(settings.get("llm_endpoint")).unwrap_or_default(),
            api_key: string_setting(settings.get("llm_api_key")).unwrap_or_default(),
            model: string_setting(settings.get("llm_model")).unwrap_or(defaults.model),
            api_version: string_setting(settings.get("llm_api_version")),
            limit_folder: id_setting(settings.get("limit_folder")),
            default_category: id_setting(settings.get("default_category")),
            max_title_length: length_setting(
                settings.get("max_title_length"),
                defaults.max_title_length,
            ),
            max_text_length: length_setting(
                settings.get("max_text_length"),
                defaults.max_text_length,
            ),
            restrict_keywords: bool_setting(settings.get("restrict_keywords")),
            additional_prompt: string_setting(settings.get("additional_prompt"))
                .unwrap_or_default(),
            pdftotext_path: string_setting(settings.get("pdftotext_path")).map(PathBuf::from),
        }
    }
}

/// Checkbox settings arrive as bools, ints, or strings.
fn bool_setting(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(text)) => {
            !text.is_empty() && text != "0" && !text.eq_ignore_ascii_case("false")
        }
        _ => false,
    }
}

/// Text settings; empty strings count as unset.
fn string_setting(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Folder/category selections arrive as ints, numeric strings, or
/// one-element arrays. Non-positive ids mean "unset".
fn id_setting(value: Option<&Value>) -> Option<u32> {
    match value {
        Some(Value::Number(number)) => number.as_i64().filter(|id| *id > 0).map(|id| id as u32),
        Some(Value::String(text)) => text.parse::<i64>().ok().filter(|id| *id > 0).map(|id| id as u32),
        Some(Value::Array(items)) => id_setting(items.first()),
        _ => None,
    }
}

/// Positive length settings with a fallback default.
fn length_setting(value: Option<&Value>, default: usize) -> usize {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(length) if length > 0 => length as usize,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(entries: &[(&str, Value)]) -> HashMap<String, Value> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();

        assert!(!config.enabled);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_text_length, 4000);
        assert_eq!(config.max_title_length, 100);
        assert!(config.limit_folder.is_none());
        assert!(config.pdftotext_path.is_none());
    }

    #[test]
    fn test_from_settings_full() {
        let config = ClassifierConfig::from_settings(&settings(&[
            ("llm_enabled", json!(true)),
            ("llm_endpoint", json!("https://api.openai.com/v1")),
            ("llm_api_key", json!("sk-test")),
            ("llm_model", json!("gpt-4o-mini")),
            ("llm_api_version", json!("2024-06-01")),
            ("limit_folder", json!(12)),
            ("default_category", json!(3)),
            ("max_title_length", json!(80)),
            ("max_text_length", json!(2000)),
            ("restrict_keywords", json!(1)),
            ("additional_prompt", json!("Prefer German names.")),
            ("pdftotext_path", json!("/opt/poppler/bin/pdftotext")),
        ]));

        assert!(config.enabled);
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_version.as_deref(), Some("2024-06-01"));
        assert_eq!(config.limit_folder, Some(12));
        assert_eq!(config.default_category, Some(3));
        assert_eq!(config.max_title_length, 80);
        assert_eq!(config.max_text_length, 2000);
        assert!(config.restrict_keywords);
        assert_eq!(config.additional_prompt, "Prefer German names.");
        assert_eq!(
            config.pdftotext_path,
            Some(PathBuf::from("/opt/poppler/bin/pdftotext"))
        );
    }

    #[test]
    fn test_from_settings_lenient_forms() {
        let config = ClassifierConfig::from_settings(&settings(&[
            ("llm_enabled", json!("1")),
            ("llm_endpoint", json!("https://api.openai.com/v1")),
            ("limit_folder", json!(["42"])),
            ("default_category", json!("7")),
            ("max_text_length", json!("2500")),
            ("restrict_keywords", json!("0")),
        ]));

        assert!(config.enabled);
        assert_eq!(config.limit_folder, Some(42));
        assert_eq!(config.default_category, Some(7));
        assert_eq!(config.max_text_length, 2500);
        assert!(!config.restrict_keywords);
    }

    #[test]
    fn test_from_settings_unset_and_invalid() {
        let config = ClassifierConfig::from_settings(&settings(&[
            ("limit_folder", json!(0)),
            ("default_category", json!(-5)),
            ("max_title_length", json!("not a number")),
            ("llm_endpoint", json!("")),
        ]));

        assert!(!config.enabled);
        assert!(config.limit_folder.is_none());
        assert!(config.default_category.is_none());
        assert_eq!(config.max_title_length, DEFAULT_MAX_TITLE_LENGTH);
        assert!(config.endpoint.is_empty());
    }

    #[test]
    fn test_from_settings_empty_array_id() {
        let config =
            ClassifierConfig::from_settings(&settings(&[("limit_folder", json!([]))]));

        assert!(config.limit_folder.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClassifierConfig::new()
            .enabled()
            .with_endpoint("https://api.openai.com/v1")
            .with_model("gpt-4o")
            .with_limit_folder(5)
            .restrict_keywords();

        assert!(config.enabled);
        assert_eq!(config.limit_folder, Some(5));
        assert!(config.restrict_keywords);
    }
}
