/*!
 * # LingoCache - cached translation service
 *
 * A Rust library and HTTP service that serves translations from a persistent
 * cache and only calls the translation provider (DeepL) on a miss.
 *
 * ## Features
 *
 * - Cache-aside translation keyed by (source text, target language)
 * - SQLite store with a compound unique key and single-statement upsert
 * - In-memory store for development and tests
 * - DeepL client with transient/permanent failure classification
 * - Case-insensitive validation against a configurable language set
 * - HTTP API with health, language and statistics endpoints
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `language_utils`: Target language validation and names
 * - `database`: Cache store trait and its SQLite and in-memory backends
 * - `providers`: Translation provider clients:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::mock`: Scriptable offline provider
 * - `translation`: The cache-aside `TranslationService`
 * - `api`: axum router and handlers
 * - `app_controller`: Service lifecycle and environment checks
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod api;
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{MemoryStore, Repository, TranslationKey, TranslationRecord, TranslationStore};
pub use errors::{AppError, ProviderError, StoreError, TranslationError};
pub use language_utils::LanguageSet;
pub use providers::TranslationProvider;
pub use translation::{TranslationResult, TranslationService};
