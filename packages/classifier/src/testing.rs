//! Testing utilities including mock host objects and a mock completion
//! provider.
//!
//! These are useful for testing applications that embed the classifier
//! without a real DMS or any network calls.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ClassifierError, Result};
use crate::host::{Category, Dms, Document, DocumentContent, Folder, KeywordCategory};
use crate::provider::CompletionProvider;
use crate::result::ClassificationResult;

/// A mock folder node. Parents are set after construction so test trees (and
/// deliberately corrupt cyclic graphs) can be wired up freely.
pub struct MockFolder {
    id: u32,
    name: String,
    parent: RwLock<Option<Arc<dyn Folder>>>,
}

impl MockFolder {
    /// Create a parentless folder.
    pub fn new(id: u32, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.into(),
            parent: RwLock::new(None),
        })
    }

    /// Set the parent folder.
    pub fn set_parent(&self, parent: Arc<dyn Folder>) {
        *self.parent.write().unwrap() = Some(parent);
    }
}

impl Folder for MockFolder {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn parent(&self) -> Option<Arc<dyn Folder>> {
        self.parent.read().unwrap().clone()
    }
}

/// A mock content revision.
#[derive(Debug, Clone)]
pub struct MockContent {
    mime_type: String,
    path: String,
}

impl DocumentContent for MockContent {
    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }
}

/// A mock document with mutable metadata and configurable setter failures.
#[derive(Default)]
pub struct MockDocument {
    id: u32,
    name: RwLock<String>,
    keywords: RwLock<String>,
    categories: RwLock<Vec<Category>>,
    content: Option<MockContent>,
    folder: Option<Arc<dyn Folder>>,
    fail_set_name: bool,
    fail_set_keywords: bool,
    fail_add_categories: bool,
}

impl MockDocument {
    /// Create an empty document.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Set the current name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        *self.name.write().unwrap() = name.into();
        self
    }

    /// Set the current keyword string.
    pub fn with_keywords(self, keywords: impl Into<String>) -> Self {
        *self.keywords.write().unwrap() = keywords.into();
        self
    }

    /// Give the document a content revision.
    pub fn with_content(mut self, mime_type: impl Into<String>, path: impl Into<String>) -> Self {
        self.content = Some(MockContent {
            mime_type: mime_type.into(),
            path: path.into(),
        });
        self
    }

    /// Place the document in a folder.
    pub fn with_folder(mut self, folder: Arc<dyn Folder>) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Pre-assign a category.
    pub fn with_category(self, category: Category) -> Self {
        self.categories.write().unwrap().push(category);
        self
    }

    /// Make `set_name` fail.
    pub fn fail_set_name(mut self) -> Self {
        self.fail_set_name = true;
        self
    }

    /// Make `set_keywords` fail.
    pub fn fail_set_keywords(mut self) -> Self {
        self.fail_set_keywords = true;
        self
    }

    /// Make `add_categories` fail.
    pub fn fail_add_categories(mut self) -> Self {
        self.fail_add_categories = true;
        self
    }
}

impl Document for MockDocument {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> String {
        self.name.read().unwrap().clone()
    }

    fn keywords(&self) -> String {
        self.keywords.read().unwrap().clone()
    }

    fn latest_content(&self) -> Option<Box<dyn DocumentContent>> {
        self.content
            .clone()
            .map(|content| Box::new(content) as Box<dyn DocumentContent>)
    }

    fn folder(&self) -> Option<Arc<dyn Folder>> {
        self.folder.clone()
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.read().unwrap().clone()
    }

    fn set_name(&self, name: &str) -> bool {
        if self.fail_set_name {
            return false;
        }
        *self.name.write().unwrap() = name.to_string();
        true
    }

    fn set_keywords(&self, keywords: &str) -> bool {
        if self.fail_set_keywords {
            return false;
        }
        *self.keywords.write().unwrap() = keywords.to_string();
        true
    }

    fn add_categories(&self, categories: &[Category]) -> bool {
        if self.fail_add_categories {
            return false;
        }
        self.categories
            .write()
            .unwrap()
            .extend(categories.iter().cloned());
        true
    }
}

/// A mock DMS with configurable categories and keyword lists.
#[derive(Default)]
pub struct MockDms {
    content_dir: PathBuf,
    categories: Vec<Category>,
    keyword_categories: Vec<KeywordCategory>,
}

impl MockDms {
    /// Create an empty DMS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content store root.
    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    /// Add a document category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Add a keyword category.
    pub fn with_keyword_category(mut self, category: KeywordCategory) -> Self {
        self.keyword_categories.push(category);
        self
    }
}

impl Dms for MockDms {
    fn content_dir(&self) -> PathBuf {
        self.content_dir.clone()
    }

    fn document_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn document_category(&self, id: u32) -> Option<Category> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
    }

    fn keyword_categories(&self) -> Vec<KeywordCategory> {
        self.keyword_categories.clone()
    }
}

/// Record of one call made to [`MockProvider`].
#[derive(Debug, Clone)]
pub struct MockProviderCall {
    /// System prompt as sent
    pub system_prompt: String,

    /// User message as sent
    pub user_message: String,
}

/// A mock completion provider returning a configured result or failure.
#[derive(Default)]
pub struct MockProvider {
    result: Option<ClassificationResult>,
    failure: Option<String>,
    calls: Arc<RwLock<Vec<MockProviderCall>>>,
}

impl MockProvider {
    /// Create a provider that answers with an empty classification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with this result.
    pub fn with_result(mut self, result: ClassificationResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Fail every request with this message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<MockProviderCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ClassificationResult> {
        self.calls.write().unwrap().push(MockProviderCall {
            system_prompt: system_prompt.to_string(),
            user_message: user_message.to_string(),
        });

        if let Some(message) = &self.failure {
            return Err(ClassifierError::Provider(message.clone().into()));
        }

        Ok(self.result.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_records_calls() {
        let provider = MockProvider::new()
            .with_result(ClassificationResult::new().with_name("Invoice 123"));

        let result = provider.complete("system", "user").await.unwrap();
        assert_eq!(result.name.as_deref(), Some("Invoice 123"));

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt, "system");
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockProvider::new().failing("HTTP 500");

        assert!(provider.complete("system", "user").await.is_err());
    }

    #[test]
    fn test_mock_document_setters() {
        let document = MockDocument::new(1).with_name("old");

        assert!(document.set_name("new"));
        assert_eq!(document.name(), "new");

        let failing = MockDocument::new(2).with_name("old").fail_set_name();
        assert!(!failing.set_name("new"));
        assert_eq!(failing.name(), "old");
    }

    #[test]
    fn test_mock_folder_chain() {
        let root = MockFolder::new(1, "root");
        let child = MockFolder::new(2, "child");
        child.set_parent(root);

        let parent = child.parent().unwrap();
        assert_eq!(parent.id(), 1);
        assert!(parent.parent().is_none());
    }
}
