//! Classification result returned by the completion provider.

use serde::{Deserialize, Serialize};

/// A string field the model may answer as a JSON array or as a single
/// (possibly comma-separated) string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// Single string
    One(String),
    /// Array of strings
    Many(Vec<String>),
}

impl StringList {
    /// Values as delivered, a single string kept whole.
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }

    /// Values with a single string split on commas, every entry trimmed and
    /// empties dropped.
    pub fn split_values(&self) -> Vec<String> {
        let raw = match self {
            Self::One(value) => value.split(',').map(str::to_string).collect(),
            Self::Many(values) => values.clone(),
        };
        raw.into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&[&str]> for StringList {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|value| value.to_string()).collect())
    }
}

/// Structured classification produced by one pipeline run.
///
/// All fields are optional; the model answers with whatever it could
/// determine. At most one result exists per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Suggested document name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Suggested category names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<StringList>,

    /// Suggested keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<StringList>,
}

impl ClassificationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the suggested name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the suggested categories.
    pub fn with_categories(mut self, categories: impl Into<StringList>) -> Self {
        self.categories = Some(categories.into());
        self
    }

    /// Set the suggested keywords.
    pub fn with_keywords(mut self, keywords: impl Into<StringList>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}
