/*!
 * Error types for the lingocache service.
 *
 * This module contains custom error types for each layer of the service,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling the translation provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Network or service failure; the same request may succeed later
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider declined the input (bad language pair, quota, credentials)
    #[error("Provider rejected the request: {message}")]
    Rejected {
        /// HTTP status code, when the rejection came from the API itself
        status_code: Option<u16>,
        /// Error message from the API
        message: String,
    },
}

impl ProviderError {
    /// Create a rejection that did not come from an HTTP response
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status_code: None,
            message: message.into(),
        }
    }

    /// Whether retrying the same input may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors that can occur when working with the cache store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The underlying storage could not be reached or failed mid-operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// No record exists for the requested key
    #[error("No cached translation for '{source_text}' ({target_language})")]
    NotFound {
        /// Normalized source text
        source_text: String,
        /// Normalized target language
        target_language: String,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Unavailable(format!("Database task failed: {}", error))
    }
}

/// Errors surfaced to callers of the translation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Empty or malformed text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target language outside the supported set
    #[error("Unsupported target language: {0}")]
    InvalidLanguage(String),

    /// Transient provider failure
    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Permanent provider failure for this input
    #[error("Translation failed: {0}")]
    TranslationFailed(String),
}

impl TranslationError {
    /// Stable snake_case identifier of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidLanguage(_) => "invalid_language",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::TranslationFailed(_) => "translation_failed",
        }
    }

    /// Whether the error was caused by the request rather than a dependency
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidLanguage(_))
    }
}

impl From<ProviderError> for TranslationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable(message) => Self::ServiceUnavailable(message),
            ProviderError::Rejected { message, .. } => Self::TranslationFailed(message),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the cache store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
