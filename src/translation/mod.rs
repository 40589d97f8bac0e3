/*!
 * Translation cache-aside service.
 *
 * This module contains the request-facing side of the cache:
 *
 * - `service`: the `TranslationService` orchestrating store and provider
 * - request/result types shared with the HTTP and CLI surfaces
 */

use serde::{Deserialize, Serialize};

// Re-export main types for easier usage
pub use self::service::{ServiceStats, ServiceStatsSnapshot, TranslationService};

pub mod service;

/// A translation request as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate, as submitted
    pub text: Option<String>,

    /// Requested target language, as submitted
    pub target_lang: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            target_lang: Some(target_lang.into()),
        }
    }
}

/// Result returned to callers of `get_translation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// The text exactly as submitted
    pub original: String,

    /// Translated text
    pub translation: String,

    /// Normalized target language code
    pub target_lang: String,

    /// Whether the translation was served from the store without a provider call
    pub cached: bool,
}

/// Kind of a field-level validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field absent
    Missing,
    /// Empty or whitespace-only text
    InvalidInput,
    /// Target language outside the supported set
    InvalidLanguage,
    /// Field given more than once
    Duplicate,
}

/// One violated constraint of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name (`text` or `target_lang`)
    pub field: String,

    /// Human-readable message
    pub message: String,

    /// Error kind
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }
}

/// Normalize text for key purposes
///
/// Surrounding whitespace is incidental; everything else is kept verbatim.
pub fn normalize_text(text: &str) -> &str {
    text.trim()
}

/// Shorten text for log lines
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}
