//! Upload hook: the single entry point invoked by the host after a document
//! is stored.
//!
//! Every failure path is a logged no-op. The host's upload transaction is
//! never interrupted; classification is best-effort and strictly additive to
//! an already-successful upload.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::config::ClassifierConfig;
use crate::host::{Dms, Document};
use crate::pipeline::Classifier;
use crate::provider::CompletionProvider;
use crate::result::ClassificationResult;

/// Outcome of one upload-hook run, returned to the caller instead of being
/// stashed in ambient session state.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// The classification the provider produced
    pub result: ClassificationResult,

    /// Whether applying it changed the document
    pub applied: bool,
}

/// Handle a freshly stored document.
///
/// Resolves the host handles, builds a classifier from the settings mapping,
/// and runs it once. Returns `None` when the DMS handle is missing,
/// classification is disabled, the document is out of folder scope, or the
/// run itself fails; the outcome otherwise.
pub async fn handle_document_added(
    settings: &HashMap<String, Value>,
    dms: Option<Arc<dyn Dms>>,
    document: &dyn Document,
) -> Option<UploadOutcome> {
    info!(document_id = document.id(), "document uploaded");

    let Some(dms) = dms else {
        error!("DMS handle not available");
        return None;
    };

    let config = ClassifierConfig::from_settings(settings);
    let classifier = Classifier::new(config, dms);
    run_classifier(&classifier, document).await
}

/// The hook body for a pre-built classifier: gate checks, one classification
/// run, one application pass.
pub async fn run_classifier<P: CompletionProvider>(
    classifier: &Classifier<P>,
    document: &dyn Document,
) -> Option<UploadOutcome> {
    if !classifier.is_enabled() {
        info!("classification disabled");
        return None;
    }

    if !classifier.is_document_in_allowed_folder(document) {
        info!(
            document_id = document.id(),
            "document outside allowed folder"
        );
        return None;
    }

    let result = classifier.classify_document(document).await?;
    let applied = classifier.apply_classification(document, &result);
    info!(document_id = document.id(), applied, "classification finished");

    Some(UploadOutcome { result, applied })
}

/// Session-scoped store of the last classification per document, kept by the
/// host for UI display. No persistence; cleared with the session.
#[derive(Debug, Default)]
pub struct SessionResults {
    results: HashMap<u32, ClassificationResult>,
}

impl SessionResults {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of an upload-hook run.
    pub fn record(&mut self, document_id: u32, outcome: &UploadOutcome) {
        self.results.insert(document_id, outcome.result.clone());
    }

    /// Last classification for a document, if any.
    pub fn get(&self, document_id: u32) -> Option<&ClassificationResult> {
        self.results.get(&document_id)
    }

    /// Remove and return the last classification for a document.
    pub fn take(&mut self, document_id: u32) -> Option<ClassificationResult> {
        self.results.remove(&document_id)
    }

    /// Drop all stored results.
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Whether anything is stored.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
