//! Prompt templates for document classification.
//!
//! The system prompt pins the reply to a JSON object with `name`,
//! `categories`, and `keywords`; the user message carries the extracted
//! document text.

/// System prompt template.
pub const SYSTEM_PROMPT: &str = r#"You are a document classification assistant. Analyze the PDF document and provide:

1. **name**: A clear, descriptive name (in the document's language, max {max_title_length} characters)
2. **categories**: Select from this list: {categories}
{keyword_instruction}

IMPORTANT: For tax-related documents (invoices, receipts, expenses), include "Steuer" in keywords if available.

Respond with valid JSON only:
{"name": "Document Name", "categories": ["Category"], "keywords": ["keyword1", "keyword2"]}"#;

/// Keyword instruction when suggestions are unrestricted.
const KEYWORD_INSTRUCTION_FREE: &str =
    "3. **keywords**: Relevant search keywords (in the document's language)";

/// Keyword instruction when suggestions are restricted to configured values.
const KEYWORD_INSTRUCTION_RESTRICTED: &str =
    "3. **keywords**: Select ONLY from this list: {keywords}";

/// User message template.
pub const USER_MESSAGE: &str = r#"Classify this document. Current filename: "{current_name}"

Document content:
---
{text}
---

Provide JSON with name, categories, and keywords."#;

/// Format the system prompt.
///
/// `configured_keywords` empty means free keyword suggestions; otherwise the
/// model is told to pick only from that list. `additional_prompt` is appended
/// verbatim when non-empty.
pub fn format_system_prompt(
    max_title_length: usize,
    category_names: &[String],
    configured_keywords: &[String],
    additional_prompt: &str,
) -> String {
    let categories =
        serde_json::to_string(category_names).unwrap_or_else(|_| "[]".to_string());

    let keyword_instruction = if configured_keywords.is_empty() {
        KEYWORD_INSTRUCTION_FREE.to_string()
    } else {
        let keywords =
            serde_json::to_string(configured_keywords).unwrap_or_else(|_| "[]".to_string());
        KEYWORD_INSTRUCTION_RESTRICTED.replace("{keywords}", &keywords)
    };

    let mut prompt = SYSTEM_PROMPT
        .replace("{max_title_length}", &max_title_length.to_string())
        .replace("{categories}", &categories)
        .replace("{keyword_instruction}", &keyword_instruction);

    if !additional_prompt.is_empty() {
        prompt.push_str("\n\nADDITIONAL INSTRUCTIONS:\n");
        prompt.push_str(additional_prompt);
    }

    prompt
}

/// Format the user message with the extracted text and the current document
/// name.
pub fn format_user_message(text: &str, current_name: &str) -> String {
    USER_MESSAGE
        .replace("{current_name}", current_name)
        .replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_offers_categories() {
        let prompt = format_system_prompt(
            100,
            &["Invoices".to_string(), "Contracts".to_string()],
            &[],
            "",
        );

        assert!(prompt.contains(r#"["Invoices","Contracts"]"#));
        assert!(prompt.contains("max 100 characters"));
        assert!(prompt.contains("Relevant search keywords"));
        assert!(!prompt.contains("ADDITIONAL INSTRUCTIONS"));
    }

    #[test]
    fn test_system_prompt_restricts_keywords() {
        let prompt = format_system_prompt(
            100,
            &[],
            &["Invoice".to_string(), "Steuer".to_string()],
            "",
        );

        assert!(prompt.contains(r#"Select ONLY from this list: ["Invoice","Steuer"]"#));
        assert!(!prompt.contains("Relevant search keywords"));
    }

    #[test]
    fn test_system_prompt_appends_additional_instructions() {
        let prompt = format_system_prompt(100, &[], &[], "Prefer German names.");

        assert!(prompt.ends_with("ADDITIONAL INSTRUCTIONS:\nPrefer German names."));
    }

    #[test]
    fn test_user_message_carries_name_and_text() {
        let message = format_user_message("Invoice #123 ...", "scan_0042.pdf");

        assert!(message.contains(r#"Current filename: "scan_0042.pdf""#));
        assert!(message.contains("Invoice #123 ..."));
    }
}
