//! PDF text extraction via the `pdftotext` command-line tool.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ExtractError;

/// Default location of the `pdftotext` binary.
pub const DEFAULT_PDFTOTEXT_PATH: &str = "/usr/bin/pdftotext";

/// Marker appended when extracted text is cut at the length cap.
const TRUNCATION_MARKER: &str = "...";

/// Extracts plain text from PDF files by shelling out to `pdftotext`.
///
/// The tool path is validated once at construction; a failed validation is
/// permanent for the instance and every later [`extract_text`] call is a
/// logged no-op.
///
/// [`extract_text`]: PdfExtractor::extract_text
pub struct PdfExtractor {
    tool_path: PathBuf,
    init_error: Option<String>,
}

impl PdfExtractor {
    /// Create an extractor using the given tool path, or the fixed default
    /// when none is configured.
    pub fn new(tool_path: Option<PathBuf>) -> Self {
        let tool_path = tool_path.unwrap_or_else(|| PathBuf::from(DEFAULT_PDFTOTEXT_PATH));
        let init_error = validate_tool(&tool_path).err();

        if let Some(error) = &init_error {
            warn!(tool = %tool_path.display(), error = %error, "pdftotext unavailable");
        }

        Self {
            tool_path,
            init_error,
        }
    }

    /// Whether the extraction tool is available and executable.
    pub fn is_ready(&self) -> bool {
        self.init_error.is_none()
    }

    /// Diagnostic from tool validation, `None` when ready.
    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    /// Extract whitespace-normalized text from a PDF, capped at `max_length`
    /// characters with a trailing `...` when cut.
    ///
    /// Returns `None` (with a logged warning) when the extractor is not
    /// ready, the file is missing or unreadable, the tool fails, or no text
    /// comes back.
    pub async fn extract_text(&self, file_path: &Path, max_length: usize) -> Option<String> {
        match self.run_tool(file_path).await {
            Ok(text) => {
                debug!(
                    file = %file_path.display(),
                    chars = text.chars().count(),
                    "extracted text"
                );
                Some(truncate_chars(&text, max_length))
            }
            Err(error) => {
                warn!(file = %file_path.display(), error = %error, "text extraction failed");
                None
            }
        }
    }

    async fn run_tool(&self, file_path: &Path) -> Result<String, ExtractError> {
        if let Some(error) = &self.init_error {
            return Err(ExtractError::NotReady(error.clone()));
        }
        if !file_path.exists() {
            return Err(ExtractError::FileNotFound(file_path.to_path_buf()));
        }
        std::fs::File::open(file_path).map_err(|source| ExtractError::Unreadable {
            path: file_path.to_path_buf(),
            source,
        })?;

        // Output goes to a scoped temp file, unlinked on drop on every exit
        // path.
        let output_file = NamedTempFile::new().map_err(ExtractError::TempFile)?;

        let output = Command::new(&self.tool_path)
            .arg("-layout")
            .arg(file_path)
            .arg(output_file.path())
            .output()
            .await
            .map_err(|source| ExtractError::Spawn {
                tool: self.tool_path.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if diagnostic.is_empty() {
                diagnostic = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(ExtractError::ToolFailed {
                tool: self.tool_path.display().to_string(),
                code: output.status.code().unwrap_or(-1),
                output: diagnostic,
            });
        }

        let raw = tokio::fs::read(output_file.path())
            .await
            .map_err(ExtractError::OutputRead)?;
        let text = collapse_whitespace(&String::from_utf8_lossy(&raw));
        if text.is_empty() {
            return Err(ExtractError::EmptyOutput);
        }

        Ok(text)
    }
}

fn validate_tool(path: &Path) -> Result<(), String> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| format!("pdftotext binary not found at: {}", path.display()))?;

    if !metadata.is_file() {
        return Err(format!("pdftotext path is not a file: {}", path.display()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(format!(
                "pdftotext binary is not executable: {}",
                path.display()
            ));
        }
    }

    Ok(())
}

/// Collapse whitespace runs to single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to `max_length` characters, appending the truncation marker when cut.
fn truncate_chars(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_length).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}
