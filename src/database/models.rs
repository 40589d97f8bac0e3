/*!
 * Cache entity models.
 *
 * These structures map directly to the `translations` table and provide
 * type-safe access to persisted data.
 */

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Compound key of a cached translation
///
/// Both parts are expected to be normalized already: surrounding whitespace
/// trimmed from the text and the language code uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationKey {
    /// Normalized source text
    pub source_text: String,
    /// Normalized target language code
    pub target_language: String,
}

impl TranslationKey {
    pub fn new(source_text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
        }
    }
}

/// A cached translation as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Source text, normalized for key purposes
    pub source_text: String,
    /// Normalized target language code
    pub target_language: String,
    /// Translated text
    pub translation: String,
    /// Set once, at first insertion
    pub created_at: DateTime<Utc>,
    /// Refreshed on every hit and on every write
    pub last_accessed_at: DateTime<Utc>,
    /// Number of cache hits served from this record
    pub hit_count: i64,
}

impl TranslationRecord {
    /// Create a fresh record stamped with the given time
    pub fn new(key: &TranslationKey, translation: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            source_text: key.source_text.clone(),
            target_language: key.target_language.clone(),
            translation: translation.into(),
            created_at: now,
            last_accessed_at: now,
            hit_count: 0,
        }
    }

    /// Key of this record
    pub fn key(&self) -> TranslationKey {
        TranslationKey::new(self.source_text.clone(), self.target_language.clone())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of cache entries
    pub total_entries: i64,
    /// Total number of cache hits
    pub total_hits: i64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cache entries: {}, Cache hits: {}", self.total_entries, self.total_hits)
    }
}

/// Format a timestamp the way it is persisted
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a persisted timestamp
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
