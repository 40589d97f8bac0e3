/*!
 * Cache store for translated text.
 *
 * This module provides the persistent translation cache:
 * - `TranslationStore`: the store contract used by the translation service
 * - `Repository`: SQLite-backed store with a compound unique key
 * - `MemoryStore`: in-process store for development and tests
 */

use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::app_config::{Config, StoreBackend};
use crate::errors::StoreError;

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;
pub mod memory;

// Re-export main types
pub use connection::DatabaseConnection;
pub use memory::MemoryStore;
pub use models::{CacheStats, TranslationKey, TranslationRecord};
pub use repository::Repository;

/// Key-value store of translations keyed by (source text, target language)
///
/// Implementations enforce key uniqueness themselves; callers never need
/// to coordinate concurrent writes for the same key.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Short backend identifier for logs and health reports
    fn backend_name(&self) -> &'static str;

    /// Exact-match lookup; never mutates the record
    async fn lookup(&self, key: &TranslationKey) -> Result<Option<TranslationRecord>, StoreError>;

    /// Refresh `last_accessed_at` of an existing record
    ///
    /// Returns `StoreError::NotFound` when no record exists for the key.
    async fn touch(&self, key: &TranslationKey) -> Result<(), StoreError>;

    /// Insert a record, or update `translation` and `last_accessed_at` of the
    /// existing one, in a single atomic write
    async fn upsert(&self, key: &TranslationKey, translation: &str) -> Result<(), StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Entry and hit counts
    async fn stats(&self) -> Result<CacheStats, StoreError>;

    /// Release the underlying resources
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Open the store selected by the configuration
pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn TranslationStore>> {
    match config.database.backend {
        StoreBackend::Sqlite => {
            let path = config.database_path()?;
            let repository = Repository::new(DatabaseConnection::new(&path)?);
            Ok(Arc::new(repository))
        }
        StoreBackend::Memory => {
            info!("Using in-memory translation cache; entries are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
