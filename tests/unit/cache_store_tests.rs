/*!
 * Tests for the SQLite and in-memory cache stores
 */

use anyhow::Result;
use std::sync::Arc;

use lingocache::database::{
    DatabaseConnection, MemoryStore, Repository, TranslationKey, TranslationStore,
};
use lingocache::errors::StoreError;
use crate::common;

/// Run the same contract checks against any store
async fn assert_store_contract(store: &dyn TranslationStore) -> Result<()> {
    let key = TranslationKey::new("Hello", "ES");

    assert!(store.lookup(&key).await?.is_none());
    assert!(matches!(store.touch(&key).await, Err(StoreError::NotFound { .. })));

    store.upsert(&key, "Hola").await?;
    let inserted = store.lookup(&key).await?.expect("record after upsert");
    assert_eq!(inserted.translation, "Hola");
    assert_eq!(inserted.created_at, inserted.last_accessed_at);

    store.touch(&key).await?;
    store.upsert(&key, "¡Hola!").await?;
    let updated = store.lookup(&key).await?.expect("record after second upsert");
    assert_eq!(updated.translation, "¡Hola!");
    assert_eq!(updated.created_at, inserted.created_at);
    assert!(updated.last_accessed_at >= inserted.last_accessed_at);
    assert_eq!(updated.hit_count, 1);

    let stats = store.stats().await?;
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.total_hits, 1);
    Ok(())
}

/// Test the SQLite store against the store contract
#[tokio::test]
async fn test_sqliteStore_shouldHonorContract() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    assert_store_contract(&repo).await
}

/// Test the in-memory store against the store contract
#[tokio::test]
async fn test_memoryStore_shouldHonorContract() -> Result<()> {
    let store = MemoryStore::new();
    assert_store_contract(&store).await
}

/// Test that records survive closing and reopening the database file
#[tokio::test]
async fn test_fileStore_afterReopen_shouldKeepRecords() -> Result<()> {
    let dir = common::create_temp_dir()?;

    {
        let repo = common::create_file_repository(&dir)?;
        repo.upsert(&TranslationKey::new("Good morning", "FR"), "Bonjour").await?;
        repo.close().await?;
    }

    let repo = common::create_file_repository(&dir)?;
    let record = repo
        .lookup(&TranslationKey::new("Good morning", "FR"))
        .await?
        .expect("record persisted across reopen");
    assert_eq!(record.translation, "Bonjour");
    Ok(())
}

/// Test that the database directory is created on demand
#[tokio::test]
async fn test_fileStore_withNestedPath_shouldCreateDirectories() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("nested").join("deeper").join("cache.db");

    let repo = Repository::new(DatabaseConnection::new(&path)?);
    repo.ping().await?;

    assert!(path.exists());
    Ok(())
}

/// Test that keys differing only in language are separate records
#[tokio::test]
async fn test_upsert_withSameTextDifferentLanguage_shouldKeepBoth() -> Result<()> {
    let repo = Repository::new_in_memory()?;

    repo.upsert(&TranslationKey::new("Hello", "ES"), "Hola").await?;
    repo.upsert(&TranslationKey::new("Hello", "FR"), "Bonjour").await?;

    assert_eq!(repo.stats().await?.total_entries, 2);
    assert_eq!(repo.count_for_key(&TranslationKey::new("Hello", "ES")).await?, 1);
    Ok(())
}

/// Test that many concurrent upserts for one key leave one record
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqliteStore_concurrentUpserts_shouldKeepOneRecord() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let repo = Arc::new(common::create_file_repository(&dir)?);
    let key = TranslationKey::new("Hello", "ES");

    let writes = (0..32).map(|i| {
        let repo = repo.clone();
        let key = key.clone();
        tokio::spawn(async move { repo.upsert(&key, &format!("Hola {}", i)).await })
    });

    for result in futures::future::join_all(writes).await {
        result??;
    }

    assert_eq!(repo.count_for_key(&key).await?, 1);
    let record = repo.lookup(&key).await?.expect("record after concurrent writes");
    assert!(record.translation.starts_with("Hola "));
    Ok(())
}

/// Test that a closed store reports unavailability, not absence
#[tokio::test]
async fn test_closedStores_shouldReportUnavailable() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let memory = MemoryStore::new();
    let stores: [&dyn TranslationStore; 2] = [&repo, &memory];

    for store in stores {
        store.close().await?;
        let result = store.lookup(&TranslationKey::new("Hello", "ES")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))), "{}", store.backend_name());
    }
    Ok(())
}
