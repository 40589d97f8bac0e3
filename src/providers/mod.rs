/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for translation providers:
 * - DeepL: DeepL REST API integration
 * - Mock: deterministic offline provider for development and tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{ProviderConfig, ProviderKind};
use crate::errors::ProviderError;

/// Character usage reported by a provider account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUsage {
    /// Characters translated in the current billing period
    pub character_count: u64,
    /// Character limit of the plan, if any
    pub character_limit: Option<u64>,
}

/// Common trait for all translation providers
///
/// A provider translates one text into one target language per call. It is
/// stateless; caching lives above it.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Whether a credential is available for this provider
    fn is_configured(&self) -> bool;

    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_language` - Normalized target language code (e.g. `ES`)
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or a classified failure
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Report account usage, when the provider exposes it
    async fn usage(&self) -> Result<Option<ProviderUsage>, ProviderError> {
        Ok(None)
    }
}

/// Build the provider selected by the configuration
pub fn create_provider(config: &ProviderConfig) -> Arc<dyn TranslationProvider> {
    match config.kind {
        ProviderKind::DeepL => Arc::new(deepl::DeepL::from_config(config)),
        ProviderKind::Mock => Arc::new(mock::MockProvider::working()),
    }
}

pub mod deepl;
pub mod mock;
