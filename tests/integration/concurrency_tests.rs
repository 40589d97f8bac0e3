/*!
 * Concurrent requests for the same key
 */

use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;

use lingocache::database::{MemoryStore, TranslationKey, TranslationStore};
use lingocache::providers::mock::MockProvider;
use crate::common;

/// Test that racing misses converge on a single record in SQLite
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrentMisses_sqlite_shouldConvergeOnOneRecord() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let repo = common::create_file_repository(&dir)?;
    // Slow enough that every request misses before any write lands
    let provider = MockProvider::slow(50).with_translations([("Hello", "ES", "Hola")]);
    let service = common::create_service(Arc::new(repo.clone()), provider.clone());

    let requests = (0..16).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.get_translation("Hello", "ES").await })
    });

    for result in join_all(requests).await {
        let result = result??;
        assert_eq!(result.translation, "Hola");
    }

    assert_eq!(repo.count_for_key(&TranslationKey::new("Hello", "ES")).await?, 1);
    assert!(provider.call_count() >= 1);

    let followup = service.get_translation("Hello", "ES").await?;
    assert!(followup.cached);
    Ok(())
}

/// Test that racing misses converge on a single record in memory
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrentMisses_memory_shouldConvergeOnOneRecord() -> Result<()> {
    let store = MemoryStore::new();
    let service = common::create_service(Arc::new(store.clone()), MockProvider::slow(20));

    let requests = (0..16).map(|_| service.get_translation("Goodbye", "FR"));
    let results = join_all(requests).await;

    assert!(results.iter().all(|result| result.is_ok()));
    assert_eq!(store.len(), 1);
    Ok(())
}

/// Test many keys in parallel keep one record each
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrentDistinctKeys_shouldEachBeStoredOnce() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let repo = common::create_file_repository(&dir)?;
    let service = common::create_service(Arc::new(repo.clone()), MockProvider::working());

    let requests = (0..40).map(|i| {
        let service = service.clone();
        let text = format!("sentence {}", i % 10);
        tokio::spawn(async move { service.get_translation(&text, "DE").await })
    });

    for result in join_all(requests).await {
        result??;
    }

    assert_eq!(repo.stats().await?.total_entries, 10);
    Ok(())
}
