//! Capability traits for the host's document-management objects.
//!
//! The pipeline depends only on this narrow accessor contract, never on a
//! concrete host class, so real host adapters and test doubles plug in
//! interchangeably. All objects are read-only from the pipeline's
//! perspective except for the three mutators on [`Document`].

use std::path::PathBuf;
use std::sync::Arc;

/// A document category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Host-assigned id
    pub id: u32,

    /// Display name
    pub name: String,
}

impl Category {
    /// Create a category.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A host-side grouping of predefined keyword lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCategory {
    /// Host-assigned id
    pub id: u32,

    /// Display name
    pub name: String,

    /// The grouped keyword-list entries; each entry is the host's raw
    /// `keywords` string
    pub keyword_lists: Vec<String>,
}

impl KeywordCategory {
    /// Create a keyword category.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        keyword_lists: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            keyword_lists: keyword_lists.into_iter().map(|entry| entry.into()).collect(),
        }
    }
}

/// A folder in the host's folder tree.
pub trait Folder: Send + Sync {
    /// Host-assigned id.
    fn id(&self) -> u32;

    /// Display name.
    fn name(&self) -> String;

    /// Parent folder, `None` at the root.
    fn parent(&self) -> Option<Arc<dyn Folder>>;
}

/// A stored content revision of a document.
pub trait DocumentContent: Send + Sync {
    /// MIME type of the stored revision.
    fn mime_type(&self) -> String;

    /// Path of the revision relative to the host's content directory.
    fn path(&self) -> String;
}

/// A document in the host's store.
pub trait Document: Send + Sync {
    /// Host-assigned id.
    fn id(&self) -> u32;

    /// Current name.
    fn name(&self) -> String;

    /// Current keyword string (comma-separated, host-managed).
    fn keywords(&self) -> String;

    /// Latest content revision, `None` for a document without content.
    fn latest_content(&self) -> Option<Box<dyn DocumentContent>>;

    /// Containing folder.
    fn folder(&self) -> Option<Arc<dyn Folder>>;

    /// Categories currently assigned.
    fn categories(&self) -> Vec<Category>;

    /// Rename the document. Returns false when the host rejects the update.
    fn set_name(&self, name: &str) -> bool;

    /// Replace the keyword string. Returns false when the host rejects the
    /// update.
    fn set_keywords(&self, keywords: &str) -> bool;

    /// Assign additional categories. Returns false when the host rejects the
    /// update.
    fn add_categories(&self, categories: &[Category]) -> bool;
}

/// The host's document-management system.
pub trait Dms: Send + Sync {
    /// Root directory of the host's content store.
    fn content_dir(&self) -> PathBuf;

    /// All document categories.
    fn document_categories(&self) -> Vec<Category>;

    /// Look up one category by id.
    fn document_category(&self, id: u32) -> Option<Category>;

    /// All keyword categories.
    fn keyword_categories(&self) -> Vec<KeywordCategory>;
}
