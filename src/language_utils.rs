/*!
 * Language utilities for target language handling.
 *
 * Target languages are provider language codes such as `ES`, `EN-US` or
 * `PT-BR`: an ISO 639-1 primary subtag, optionally followed by a region or
 * variant subtag. Codes are compared in their canonical uppercase form.
 */

use std::collections::BTreeSet;

use isolang::Language;
use once_cell::sync::Lazy;

use crate::errors::TranslationError;

/// Target language used when a request does not name one
pub const DEFAULT_TARGET_LANGUAGE: &str = "ES";

/// Target languages supported out of the box
pub static DEFAULT_SUPPORTED_LANGUAGES: Lazy<Vec<String>> = Lazy::new(|| {
    ["ES", "EN", "EN-US", "EN-GB", "FR", "DE", "IT", "PT-PT", "PT-BR", "PL"]
        .iter()
        .map(|code| code.to_string())
        .collect()
});

/// Normalize a language code to its canonical uppercase form
pub fn normalize_language_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Check that a code has the shape `LL` or `LL-RR` (ASCII letters only)
pub fn is_well_formed(code: &str) -> bool {
    let mut parts = code.split('-');
    let primary = parts.next().unwrap_or_default();
    if primary.len() != 2 || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    match (parts.next(), parts.next()) {
        (None, None) => true,
        (Some(region), None) => {
            (2..=4).contains(&region.len()) && region.chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

/// Get the English language name for a code, using its primary subtag
pub fn language_name(code: &str) -> Option<String> {
    let normalized = normalize_language_code(code).to_lowercase();
    let primary = normalized.split('-').next()?;
    Language::from_639_1(primary).map(|lang| lang.to_name().to_string())
}

/// Fixed set of target languages accepted by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet {
    codes: BTreeSet<String>,
}

impl LanguageSet {
    /// Build a set from codes in any case; surrounding whitespace is ignored
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|code| normalize_language_code(code.as_ref()))
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    /// Whether the normalized code is a member of the set
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(&normalize_language_code(code))
    }

    /// Validate a requested target language and return its normalized form
    pub fn validate(&self, code: &str) -> Result<String, TranslationError> {
        let normalized = normalize_language_code(code);
        if self.codes.contains(&normalized) {
            Ok(normalized)
        } else {
            Err(TranslationError::InvalidLanguage(code.trim().to_string()))
        }
    }

    /// Iterate over the normalized codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_LANGUAGES.iter())
    }
}

/// Validate a target language against the given set
pub fn validate_target_language(languages: &LanguageSet, code: &str) -> Result<String, TranslationError> {
    languages.validate(code)
}
