/*!
 * Cache-aside translation service.
 *
 * The service validates a request, looks the normalized key up in the
 * store, and only on a miss calls the provider and writes the result back.
 * Store failures degrade to provider calls; provider failures always reach
 * the caller. No lock is held across lookup and upsert: the store's unique
 * key keeps concurrent writers for the same key from producing duplicates.
 */

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{normalize_text, truncate_text, FieldError, FieldErrorKind, TranslationRequest, TranslationResult};
use crate::database::{CacheStats, TranslationKey, TranslationStore};
use crate::errors::{StoreError, TranslationError};
use crate::language_utils::{normalize_language_code, LanguageSet, DEFAULT_TARGET_LANGUAGE};
use crate::providers::TranslationProvider;

/// Default upper bound for a single provider call
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of source text included in log lines
const LOG_TEXT_CHARS: usize = 40;

/// In-process request counters
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    provider_calls: AtomicU64,
    store_failures: AtomicU64,
}

/// Point-in-time copy of `ServiceStats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub provider_calls: u64,
    pub store_failures: u64,
}

impl ServiceStats {
    /// Read all counters
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }

    fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Translation service serving from the store and filling it from the provider
#[derive(Clone)]
pub struct TranslationService {
    /// Cache store
    store: Arc<dyn TranslationStore>,

    /// Translation provider
    provider: Arc<dyn TranslationProvider>,

    /// Accepted target languages
    languages: LanguageSet,

    /// Target language used when a request names none
    default_target_language: String,

    /// Upper bound for each store call
    store_timeout: Duration,

    /// Upper bound for each provider call
    provider_timeout: Duration,

    /// Request counters
    stats: Arc<ServiceStats>,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(
        store: Arc<dyn TranslationStore>,
        provider: Arc<dyn TranslationProvider>,
        languages: LanguageSet,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            languages,
            default_target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            store_timeout,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            stats: Arc::new(ServiceStats::default()),
        }
    }

    /// Set the target language used when a request names none
    pub fn with_default_target_language(mut self, code: &str) -> Self {
        self.default_target_language = normalize_language_code(code);
        self
    }

    /// Set the upper bound for provider calls
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn TranslationStore> {
        &self.store
    }

    pub fn provider(&self) -> &Arc<dyn TranslationProvider> {
        &self.provider
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    pub fn default_target_language(&self) -> &str {
        &self.default_target_language
    }

    /// Current request counters
    pub fn stats(&self) -> ServiceStatsSnapshot {
        self.stats.snapshot()
    }

    /// Check every constraint of a request without any I/O
    ///
    /// On success returns the submitted text and the normalized target
    /// language. On failure returns one entry per violated constraint.
    pub fn validate_request(&self, request: &TranslationRequest) -> Result<(String, String), Vec<FieldError>> {
        let mut problems = Vec::new();

        let text = match &request.text {
            None => {
                problems.push(FieldError::new("text", "Field required", FieldErrorKind::Missing));
                None
            }
            Some(text) if normalize_text(text).is_empty() => {
                problems.push(FieldError::new(
                    "text",
                    "Text must not be empty",
                    FieldErrorKind::InvalidInput,
                ));
                None
            }
            Some(text) => Some(text.clone()),
        };

        let requested = request
            .target_lang
            .as_deref()
            .unwrap_or(&self.default_target_language);
        let language = match self.languages.validate(requested) {
            Ok(code) => Some(code),
            Err(_) => {
                problems.push(FieldError::new(
                    "target_lang",
                    format!("Unsupported target language: '{}'", requested.trim()),
                    FieldErrorKind::InvalidLanguage,
                ));
                None
            }
        };

        match (text, language) {
            (Some(text), Some(language)) if problems.is_empty() => Ok((text, language)),
            _ => Err(problems),
        }
    }

    /// Translate `text` into `target_language`, serving from the store when possible
    ///
    /// # Arguments
    /// * `text` - Text to translate; surrounding whitespace does not affect the key
    /// * `target_language` - Target language code, case-insensitive
    ///
    /// # Returns
    /// * `Result<TranslationResult, TranslationError>` - The translation with its cache origin
    pub async fn get_translation(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<TranslationResult, TranslationError> {
        let normalized_text = normalize_text(text);
        if normalized_text.is_empty() {
            return Err(TranslationError::InvalidInput("Text must not be empty".to_string()));
        }

        let target_lang = self.languages.validate(target_language)?;
        ServiceStats::record(&self.stats.requests);

        let key = TranslationKey::new(normalized_text, target_lang.as_str());

        if let Some(translation) = self.lookup_cached(&key).await {
            ServiceStats::record(&self.stats.hits);
            self.touch_best_effort(&key).await;

            return Ok(TranslationResult {
                original: text.to_string(),
                translation,
                target_lang,
                cached: true,
            });
        }

        ServiceStats::record(&self.stats.misses);
        debug!(
            "Cache miss for '{}' ({}), calling {}",
            truncate_text(normalized_text, LOG_TEXT_CHARS),
            target_lang,
            self.provider.name()
        );

        let translation = self.call_provider(&key).await?;

        if let Err(e) = self.bounded("upsert", self.store.upsert(&key, &translation)).await {
            ServiceStats::record(&self.stats.store_failures);
            warn!(
                "Failed to cache translation for '{}' ({}): {}",
                truncate_text(normalized_text, LOG_TEXT_CHARS),
                target_lang,
                e
            );
        }

        // Always false here: this request paid for a provider call.
        Ok(TranslationResult {
            original: text.to_string(),
            translation,
            target_lang,
            cached: false,
        })
    }

    /// Store statistics, bounded by the store timeout
    pub async fn cache_stats(&self) -> Result<CacheStats, StoreError> {
        self.bounded("stats", self.store.stats()).await
    }

    /// Whether the store answers a ping within the store timeout
    pub async fn store_connected(&self) -> bool {
        match self.bounded("ping", self.store.ping()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store ping failed: {}", e);
                false
            }
        }
    }

    async fn lookup_cached(&self, key: &TranslationKey) -> Option<String> {
        match self.bounded("lookup", self.store.lookup(key)).await {
            Ok(Some(record)) => {
                debug!(
                    "Cache hit for '{}' ({})",
                    truncate_text(&key.source_text, LOG_TEXT_CHARS),
                    key.target_language
                );
                Some(record.translation)
            }
            Ok(None) => None,
            Err(e) => {
                ServiceStats::record(&self.stats.store_failures);
                warn!("Cache lookup failed, falling back to provider: {}", e);
                None
            }
        }
    }

    async fn touch_best_effort(&self, key: &TranslationKey) {
        if let Err(e) = self.bounded("touch", self.store.touch(key)).await {
            ServiceStats::record(&self.stats.store_failures);
            warn!("Failed to refresh access time of cached translation: {}", e);
        }
    }

    async fn call_provider(&self, key: &TranslationKey) -> Result<String, TranslationError> {
        ServiceStats::record(&self.stats.provider_calls);

        let call = self.provider.translate(&key.source_text, &key.target_language);
        let result = match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "{} did not answer within {:?}",
                    self.provider.name(),
                    self.provider_timeout
                );
                return Err(TranslationError::ServiceUnavailable(format!(
                    "Provider timed out after {:?}",
                    self.provider_timeout
                )));
            }
        };

        result.map_err(|e| {
            error!("{} translation failed: {}", self.provider.name(), e);
            TranslationError::from(e)
        })
    }

    async fn bounded<T, F>(&self, operation: &str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, future).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "Store {} timed out after {:?}",
                operation, self.store_timeout
            ))),
        }
    }
}
