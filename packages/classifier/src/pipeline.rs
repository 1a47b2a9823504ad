//! The classification pipeline.
//!
//! Orchestrates text extraction, prompt construction, the completion call,
//! and the application of results to document metadata. Every run is linear:
//! a failed precondition halts it with a logged no-op, and nothing is ever
//! partially applied from an incomplete run.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use llm_client::ChatClient;

use crate::config::ClassifierConfig;
use crate::extractor::PdfExtractor;
use crate::host::{Dms, Document};
use crate::prompts;
use crate::provider::CompletionProvider;
use crate::result::ClassificationResult;

/// The only MIME type accepted for classification.
const PDF_MIME_TYPE: &str = "application/pdf";

/// Classifies one document per run against a configured completion provider.
///
/// Configuration is read once at construction and immutable afterwards.
/// Concurrent uploads get independent instances; nothing is shared between
/// runs except the host's own storage.
pub struct Classifier<P = ChatClient> {
    config: ClassifierConfig,
    dms: Arc<dyn Dms>,
    provider: P,
    extractor: PdfExtractor,
}

impl Classifier<ChatClient> {
    /// Build a classifier backed by the configured chat-completion endpoint
    /// and the configured extraction tool.
    pub fn new(config: ClassifierConfig, dms: Arc<dyn Dms>) -> Self {
        let mut provider = ChatClient::new(&config.endpoint, &config.api_key, &config.model);
        if let Some(api_version) = &config.api_version {
            provider = provider.with_api_version(api_version.clone());
        }
        let extractor = PdfExtractor::new(config.pdftotext_path.clone());

        Self {
            config,
            dms,
            provider,
            extractor,
        }
    }
}

impl<P: CompletionProvider> Classifier<P> {
    /// Build a classifier from explicit collaborators (hosts that bring
    /// their own provider, and tests).
    pub fn with_parts(
        config: ClassifierConfig,
        dms: Arc<dyn Dms>,
        provider: P,
        extractor: PdfExtractor,
    ) -> Self {
        Self {
            config,
            dms,
            provider,
            extractor,
        }
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Whether classification should run at all: the enable flag is set and
    /// an endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.endpoint.trim().is_empty()
    }

    /// Whether the document lies inside the configured scope folder.
    ///
    /// With no scope configured every document passes. Otherwise the
    /// document's folder and its ancestor chain are walked; the document
    /// passes iff the configured folder id appears anywhere on that chain.
    pub fn is_document_in_allowed_folder(&self, document: &dyn Document) -> bool {
        let Some(limit_folder) = self.config.limit_folder else {
            return true;
        };

        let Some(folder) = document.folder() else {
            info!(document_id = document.id(), "cannot determine document folder");
            return false;
        };

        // Explicit parent walk with a cycle guard; the host is assumed
        // acyclic but a corrupt folder graph must not hang the upload.
        let mut visited = HashSet::new();
        let mut current = Some(Arc::clone(&folder));
        while let Some(node) = current {
            if node.id() == limit_folder {
                return true;
            }
            if !visited.insert(node.id()) {
                break;
            }
            current = node.parent();
        }

        info!(
            document_id = document.id(),
            folder = %folder.name(),
            folder_id = folder.id(),
            "document is outside the allowed folder tree"
        );
        false
    }

    /// Classify one document.
    ///
    /// Returns `None` (each case logged) when the document has no content,
    /// is not a PDF, the extractor is unavailable, the file is missing from
    /// the content store, extraction yields nothing, or the completion call
    /// fails. Never touches the document.
    pub async fn classify_document(&self, document: &dyn Document) -> Option<ClassificationResult> {
        let document_id = document.id();
        info!(document_id, "starting classification");

        let Some(content) = document.latest_content() else {
            error!(document_id, "document has no content revision");
            return None;
        };

        let mime_type = content.mime_type();
        if mime_type != PDF_MIME_TYPE {
            info!(document_id, mime_type = %mime_type, "skipping non-PDF document");
            return None;
        }

        if !self.extractor.is_ready() {
            error!(
                document_id,
                error = self.extractor.init_error().unwrap_or_default(),
                "PDF extractor not ready"
            );
            return None;
        }

        let file_path = self.content_path(&content.path());
        if !file_path.exists() {
            error!(document_id, file = %file_path.display(), "file not found in content store");
            return None;
        }

        let text = match self
            .extractor
            .extract_text(&file_path, self.config.max_text_length)
            .await
        {
            Some(text) => text,
            None => {
                error!(document_id, "text extraction failed");
                return None;
            }
        };
        info!(document_id, chars = text.chars().count(), "extracted text");

        let category_names = self.category_names_for_model();
        info!(
            document_id,
            categories = category_names.len(),
            "offering categories"
        );

        let configured_keywords = if self.config.restrict_keywords {
            let keywords = self.configured_keywords();
            info!(
                document_id,
                keywords = keywords.len(),
                "keyword restriction enabled"
            );
            keywords
        } else {
            Vec::new()
        };

        let system_prompt = prompts::format_system_prompt(
            self.config.max_title_length,
            &category_names,
            &configured_keywords,
            &self.config.additional_prompt,
        );
        let user_message = prompts::format_user_message(&text, &document.name());

        info!(document_id, "requesting classification");
        match self.provider.complete(&system_prompt, &user_message).await {
            Ok(result) => {
                info!(
                    document_id,
                    result = %serde_json::to_string(&result).unwrap_or_default(),
                    "classification received"
                );
                Some(result)
            }
            Err(error) => {
                error!(document_id, error = %error, "classification request failed");
                None
            }
        }
    }

    /// Apply a classification to a document; returns whether anything
    /// changed.
    ///
    /// Four independent sub-applications run in fixed order — name,
    /// keywords, model categories, default category — and their outcomes are
    /// OR-ed. A host rejection skips only the affected sub-application.
    pub fn apply_classification(
        &self,
        document: &dyn Document,
        result: &ClassificationResult,
    ) -> bool {
        let document_id = document.id();

        let name_changed = self.apply_name(document, result);
        let keywords_changed = self.apply_keywords(document, result);
        let categories_changed = self.apply_categories(document, result);
        let default_changed = self.apply_default_category(document);

        let updated = name_changed || keywords_changed || categories_changed || default_changed;
        if updated {
            info!(document_id, "document metadata updated");
        } else {
            info!(document_id, "no changes applied");
        }
        updated
    }

    fn apply_name(&self, document: &dyn Document, result: &ClassificationResult) -> bool {
        let Some(name) = result.name.as_deref().filter(|name| !name.is_empty()) else {
            return false;
        };
        if name == document.name() {
            return false;
        }

        let length = name.chars().count();
        if length > self.config.max_title_length {
            // The limit is advisory for the model; over-length names are
            // applied verbatim.
            warn!(
                document_id = document.id(),
                length,
                limit = self.config.max_title_length,
                "generated title exceeds configured limit"
            );
        }

        if !document.set_name(name) {
            error!(document_id = document.id(), "failed to set document name");
            return false;
        }
        info!(document_id = document.id(), name = %name, "updated document name");
        true
    }

    fn apply_keywords(&self, document: &dyn Document, result: &ClassificationResult) -> bool {
        let Some(keywords) = &result.keywords else {
            return false;
        };
        let keywords = keywords.split_values();
        if keywords.is_empty() {
            return false;
        }

        let keywords = self.filter_keywords(keywords, document.id());
        if keywords.is_empty() {
            info!(
                document_id = document.id(),
                "no keywords to apply after filtering"
            );
            return false;
        }

        // Append to the existing keyword string, never replace it.
        let additions = keywords.join(", ");
        let existing = document.keywords();
        let merged = if existing.is_empty() {
            additions.clone()
        } else {
            format!("{existing}, {additions}")
        };

        if !document.set_keywords(&merged) {
            error!(
                document_id = document.id(),
                "failed to set document keywords"
            );
            return false;
        }
        info!(document_id = document.id(), keywords = %additions, "appended keywords");
        true
    }

    /// Keep only keywords that case-insensitively match a configured value,
    /// substituting the configured canonical casing.
    fn filter_keywords(&self, keywords: Vec<String>, document_id: u32) -> Vec<String> {
        if !self.config.restrict_keywords {
            return keywords;
        }

        let configured = self.configured_keywords();
        if configured.is_empty() {
            warn!(
                document_id,
                "keyword restriction enabled but no keywords configured"
            );
            return keywords;
        }

        let canonical: HashMap<String, &String> = configured
            .iter()
            .map(|keyword| (keyword.to_lowercase(), keyword))
            .collect();

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for keyword in keywords {
            match canonical.get(&keyword.to_lowercase()) {
                Some(configured_keyword) => accepted.push((*configured_keyword).clone()),
                None => rejected.push(keyword),
            }
        }

        if !rejected.is_empty() {
            info!(
                document_id,
                rejected = %rejected.join(", "),
                "rejected keywords outside the configured set"
            );
        }
        accepted
    }

    fn apply_categories(&self, document: &dyn Document, result: &ClassificationResult) -> bool {
        let Some(categories) = &result.categories else {
            return false;
        };
        let names = categories.values();
        if names.is_empty() {
            return false;
        }

        let available = self.dms.document_categories();
        if available.is_empty() {
            warn!(
                document_id = document.id(),
                "no categories available in the DMS"
            );
            return false;
        }

        let mut assigned: HashSet<u32> = document
            .categories()
            .iter()
            .map(|category| category.id)
            .collect();
        let mut updated = false;

        for name in names {
            let needle = name.to_lowercase();
            let Some(category) = available
                .iter()
                .find(|category| category.name.to_lowercase() == needle)
            else {
                continue;
            };
            if assigned.contains(&category.id) {
                continue;
            }
            if !document.add_categories(std::slice::from_ref(category)) {
                error!(
                    document_id = document.id(),
                    category = %category.name,
                    "failed to add category"
                );
                continue;
            }
            info!(document_id = document.id(), category = %category.name, "added category");
            assigned.insert(category.id);
            updated = true;
        }
        updated
    }

    /// Assign the configured default category regardless of what the model
    /// suggested.
    fn apply_default_category(&self, document: &dyn Document) -> bool {
        let Some(default_id) = self.config.default_category else {
            return false;
        };

        let Some(category) = self.dms.document_category(default_id) else {
            error!(
                document_id = document.id(),
                category_id = default_id,
                "default category not found"
            );
            return false;
        };

        if document
            .categories()
            .iter()
            .any(|assigned| assigned.id == default_id)
        {
            info!(
                document_id = document.id(),
                "default category already assigned"
            );
            return false;
        }

        if !document.add_categories(std::slice::from_ref(&category)) {
            error!(
                document_id = document.id(),
                category = %category.name,
                "failed to add default category"
            );
            return false;
        }
        info!(document_id = document.id(), category = %category.name, "added default category");
        true
    }

    /// Category names offered to the model; the default category is withheld
    /// because it is applied unconditionally instead.
    fn category_names_for_model(&self) -> Vec<String> {
        let categories = self.dms.document_categories();
        if categories.is_empty() {
            warn!("no document categories configured in the DMS");
        }

        categories
            .into_iter()
            .filter(|category| {
                if self.config.default_category == Some(category.id) {
                    info!(category = %category.name, "default category withheld from the model");
                    return false;
                }
                true
            })
            .map(|category| category.name)
            .collect()
    }

    /// All configured keyword values across all keyword categories.
    fn configured_keywords(&self) -> Vec<String> {
        self.dms
            .keyword_categories()
            .into_iter()
            .flat_map(|category| category.keyword_lists)
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    fn content_path(&self, storage_path: &str) -> PathBuf {
        self.dms
            .content_dir()
            .join(storage_path.trim_start_matches('/'))
    }
}
