/*!
 * In-process translation store.
 *
 * Keeps records in a shared map guarded by a read-write lock. The map key
 * is the compound translation key, so uniqueness holds by construction and
 * an upsert is a single write under the lock.
 */

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::models::{CacheStats, TranslationKey, TranslationRecord};
use super::TranslationStore;
use crate::errors::StoreError;

/// Translation store kept in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    /// Internal record storage
    records: Arc<RwLock<HashMap<TranslationKey, TranslationRecord>>>,

    /// Set after `close`
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of entries in the store
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("Memory store is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, key: &TranslationKey) -> Result<Option<TranslationRecord>, StoreError> {
        self.ensure_open()?;
        Ok(self.records.read().get(key).cloned())
    }

    async fn touch(&self, key: &TranslationKey) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut records = self.records.write();

        match records.get_mut(key) {
            Some(record) => {
                record.last_accessed_at = Utc::now();
                record.hit_count += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                source_text: key.source_text.clone(),
                target_language: key.target_language.clone(),
            }),
        }
    }

    async fn upsert(&self, key: &TranslationKey, translation: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let now = Utc::now();
        let mut records = self.records.write();

        records
            .entry(key.clone())
            .and_modify(|record| {
                record.translation = translation.to_string();
                record.last_accessed_at = now;
            })
            .or_insert_with(|| TranslationRecord::new(key, translation, now));

        debug!("Cached translation in memory ({} entries)", records.len());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn stats(&self) -> Result<CacheStats, StoreError> {
        self.ensure_open()?;
        let records = self.records.read();

        Ok(CacheStats {
            total_entries: records.len() as i64,
            total_hits: records.values().map(|record| record.hit_count).sum(),
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
