/*!
 * Repository layer for database operations.
 *
 * This module provides the SQLite implementation of the translation store,
 * abstracting away the SQL details and providing type-safe access.
 */

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{format_timestamp, parse_timestamp, CacheStats, TranslationKey, TranslationRecord};
use super::TranslationStore;
use crate::errors::StoreError;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Count records stored for a key (at most one while the schema holds)
    pub async fn count_for_key(&self, key: &TranslationKey) -> Result<i64, StoreError> {
        let key = key.clone();

        self.db
            .execute_async(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM translations WHERE source_text = ?1 AND target_language = ?2",
                    params![key.source_text, key.target_language],
                    |row| row.get(0),
                )?)
            })
            .await
    }
}

#[async_trait]
impl TranslationStore for Repository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn lookup(&self, key: &TranslationKey) -> Result<Option<TranslationRecord>, StoreError> {
        let key = key.clone();

        self.db
            .execute_async(move |conn| {
                let row: Option<(String, String, String, String, String, i64)> = conn
                    .query_row(
                        r#"
                        SELECT source_text, target_language, translation,
                               created_at, last_accessed_at, hit_count
                        FROM translations
                        WHERE source_text = ?1
                          AND target_language = ?2
                        "#,
                        params![key.source_text, key.target_language],
                        |row| {
                            Ok((
                                row.get(0)?,
                                row.get(1)?,
                                row.get(2)?,
                                row.get(3)?,
                                row.get(4)?,
                                row.get(5)?,
                            ))
                        },
                    )
                    .optional()?;

                let Some((source_text, target_language, translation, created_at, last_accessed_at, hit_count)) = row
                else {
                    return Ok(None);
                };

                let created_at = parse_timestamp(&created_at).ok_or_else(|| {
                    StoreError::Unavailable(format!("Corrupt created_at value: {}", created_at))
                })?;
                let last_accessed_at = parse_timestamp(&last_accessed_at).ok_or_else(|| {
                    StoreError::Unavailable(format!("Corrupt last_accessed_at value: {}", last_accessed_at))
                })?;

                Ok(Some(TranslationRecord {
                    source_text,
                    target_language,
                    translation,
                    created_at,
                    last_accessed_at,
                    hit_count,
                }))
            })
            .await
    }

    async fn touch(&self, key: &TranslationKey) -> Result<(), StoreError> {
        let key = key.clone();
        let now = format_timestamp(&Utc::now());

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    r#"
                    UPDATE translations
                    SET last_accessed_at = ?3, hit_count = hit_count + 1
                    WHERE source_text = ?1 AND target_language = ?2
                    "#,
                    params![key.source_text, key.target_language, now],
                )?;

                if updated == 0 {
                    return Err(StoreError::NotFound {
                        source_text: key.source_text,
                        target_language: key.target_language,
                    });
                }

                Ok(())
            })
            .await
    }

    async fn upsert(&self, key: &TranslationKey, translation: &str) -> Result<(), StoreError> {
        let key = key.clone();
        let translation = translation.to_string();
        let now = format_timestamp(&Utc::now());

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translations (
                        source_text, target_language, translation,
                        created_at, last_accessed_at, hit_count
                    ) VALUES (?1, ?2, ?3, ?4, ?4, 0)
                    ON CONFLICT(source_text, target_language) DO UPDATE SET
                        translation = excluded.translation,
                        last_accessed_at = excluded.last_accessed_at
                    "#,
                    params![key.source_text, key.target_language, translation, now],
                )?;
                debug!("Stored translation for key ({})", key.target_language);
                Ok(())
            })
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .execute_async(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
    }

    async fn stats(&self) -> Result<CacheStats, StoreError> {
        self.db
            .execute_async(|conn| {
                let (total_entries, total_hits): (i64, i64) = conn.query_row(
                    "SELECT COUNT(*), COALESCE(SUM(hit_count), 0) FROM translations",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;

                Ok(CacheStats {
                    total_entries,
                    total_hits,
                })
            })
            .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.db.close()
    }
}
