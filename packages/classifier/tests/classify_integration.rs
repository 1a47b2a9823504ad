//! Integration tests for the upload-hook flow.
//!
//! These run the full pipeline — folder gate, extraction through a stub
//! `pdftotext`, mock completion provider, metadata application — against
//! mock host objects, with no network and no real PDF tooling.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use classifier::testing::{MockDms, MockDocument, MockFolder, MockProvider};
use classifier::{
    run_classifier, Category, ClassificationResult, Classifier, ClassifierConfig, Document,
    PdfExtractor,
};

/// Write an executable stub standing in for `pdftotext`. It ignores the
/// input PDF and writes fixed text to the output file argument.
fn stub_tool(dir: &Path, text: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("pdftotext");
    std::fs::write(&path, format!("#!/bin/sh\nprintf '%s' '{text}' > \"$3\"\n")).unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
    path
}

/// A content store with one stored revision at `docs/1.pdf`.
fn content_store(dir: &Path) -> PathBuf {
    let store = dir.join("store");
    std::fs::create_dir_all(store.join("docs")).unwrap();
    std::fs::write(store.join("docs/1.pdf"), b"%PDF-1.4 stub").unwrap();
    store
}

fn enabled_config() -> ClassifierConfig {
    ClassifierConfig::new()
        .enabled()
        .with_endpoint("https://api.openai.com/v1")
}

#[tokio::test]
async fn test_end_to_end_classification_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let tool = stub_tool(dir.path(), "Invoice #123 from ACME for consulting");
    let store = content_store(dir.path());

    let dms = Arc::new(
        MockDms::new()
            .with_content_dir(&store)
            .with_category(Category::new(7, "Invoices"))
            .with_category(Category::new(9, "Contracts")),
    );
    let provider = Arc::new(
        MockProvider::new().with_result(
            ClassificationResult::new()
                .with_name("Invoice 123")
                .with_categories(vec!["invoices".to_string()])
                .with_keywords(vec!["Invoice".to_string()]),
        ),
    );
    let classifier = Classifier::with_parts(
        enabled_config(),
        dms,
        Arc::clone(&provider),
        PdfExtractor::new(Some(tool)),
    );

    let document = MockDocument::new(1)
        .with_name("scan_0042.pdf")
        .with_keywords("scanned")
        .with_content("application/pdf", "docs/1.pdf");

    let outcome = run_classifier(&classifier, &document).await.unwrap();
    assert!(outcome.applied);
    assert_eq!(outcome.result.name.as_deref(), Some("Invoice 123"));

    assert_eq!(document.name(), "Invoice 123");
    assert_eq!(document.keywords(), "scanned, Invoice");
    let categories = document.categories();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, 7);

    // The extracted text and the current name both reached the provider.
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].user_message.contains("Invoice #123 from ACME"));
    assert!(calls[0].user_message.contains("scan_0042.pdf"));
    assert!(calls[0].system_prompt.contains("Invoices"));
}

#[tokio::test]
async fn test_provider_failure_leaves_document_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let tool = stub_tool(dir.path(), "some text");
    let store = content_store(dir.path());

    let classifier = Classifier::with_parts(
        enabled_config(),
        Arc::new(MockDms::new().with_content_dir(&store)),
        MockProvider::new().failing("API returned HTTP 500"),
        PdfExtractor::new(Some(tool)),
    );

    let document = MockDocument::new(1)
        .with_name("scan_0042.pdf")
        .with_content("application/pdf", "docs/1.pdf");

    assert!(run_classifier(&classifier, &document).await.is_none());
    assert_eq!(document.name(), "scan_0042.pdf");
    assert_eq!(document.keywords(), "");
    assert!(document.categories().is_empty());
}

#[tokio::test]
async fn test_disabled_classifier_never_calls_provider() {
    let provider = Arc::new(MockProvider::new());
    let classifier = Classifier::with_parts(
        ClassifierConfig::new(),
        Arc::new(MockDms::new()),
        Arc::clone(&provider),
        PdfExtractor::new(Some(PathBuf::from("/nonexistent/pdftotext"))),
    );

    let document = MockDocument::new(1).with_content("application/pdf", "docs/1.pdf");

    assert!(run_classifier(&classifier, &document).await.is_none());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_out_of_scope_document_is_skipped() {
    let provider = Arc::new(MockProvider::new());
    let classifier = Classifier::with_parts(
        enabled_config().with_limit_folder(10),
        Arc::new(MockDms::new()),
        Arc::clone(&provider),
        PdfExtractor::new(Some(PathBuf::from("/nonexistent/pdftotext"))),
    );

    let document = MockDocument::new(1)
        .with_folder(MockFolder::new(99, "Elsewhere"))
        .with_content("application/pdf", "docs/1.pdf");

    assert!(run_classifier(&classifier, &document).await.is_none());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_in_scope_document_passes_folder_gate() {
    let dir = tempfile::tempdir().unwrap();
    let tool = stub_tool(dir.path(), "quarterly report");
    let store = content_store(dir.path());

    let classifier = Classifier::with_parts(
        enabled_config().with_limit_folder(10),
        Arc::new(MockDms::new().with_content_dir(&store)),
        MockProvider::new().with_result(ClassificationResult::new().with_name("Report Q3")),
        PdfExtractor::new(Some(tool)),
    );

    let scope = MockFolder::new(10, "Scans");
    let subfolder = MockFolder::new(11, "2026");
    subfolder.set_parent(scope);

    let document = MockDocument::new(1)
        .with_name("scan.pdf")
        .with_folder(subfolder)
        .with_content("application/pdf", "docs/1.pdf");

    let outcome = run_classifier(&classifier, &document).await.unwrap();
    assert!(outcome.applied);
    assert_eq!(document.name(), "Report Q3");
}

#[tokio::test]
async fn test_non_pdf_upload_is_ignored() {
    let provider = Arc::new(MockProvider::new());
    let classifier = Classifier::with_parts(
        enabled_config(),
        Arc::new(MockDms::new()),
        Arc::clone(&provider),
        PdfExtractor::new(Some(PathBuf::from("/nonexistent/pdftotext"))),
    );

    let document = MockDocument::new(1).with_content("image/png", "docs/1.png");

    assert!(run_classifier(&classifier, &document).await.is_none());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_default_category_applied_without_model_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let tool = stub_tool(dir.path(), "unclassifiable scribbles");
    let store = content_store(dir.path());

    let classifier = Classifier::with_parts(
        enabled_config().with_default_category(3),
        Arc::new(
            MockDms::new()
                .with_content_dir(&store)
                .with_category(Category::new(3, "Inbox")),
        ),
        MockProvider::new(),
        PdfExtractor::new(Some(tool)),
    );

    let document = MockDocument::new(1)
        .with_name("scan.pdf")
        .with_content("application/pdf", "docs/1.pdf");

    // The provider answers with an empty classification; the default
    // category is still assigned.
    let outcome = run_classifier(&classifier, &document).await.unwrap();
    assert!(outcome.applied);
    assert_eq!(document.name(), "scan.pdf");
    assert_eq!(document.categories()[0].id, 3);
}
