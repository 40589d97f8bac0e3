/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;

use lingocache::api::{self, AppState};
use lingocache::app_config::{Config, ProviderKind, StoreBackend};
use lingocache::app_controller::Controller;
use lingocache::database::{TranslationKey, TranslationStore};
use lingocache::providers::deepl::DeepL;
use crate::common::{self, mock_deepl::{DeepLBehavior, MockDeepL}};

fn sqlite_mock_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.database.backend = StoreBackend::Sqlite;
    config.database.path = Some(dir.path().join("lingocache.db"));
    config.provider.kind = ProviderKind::Mock;
    config
}

/// Test the controller initialization with test defaults
#[test]
fn test_controllerInitialization_withTestConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.service().default_target_language(), "ES");
    Ok(())
}

/// Test a one-shot translation outside an async test
#[test]
fn test_controllerTranslate_withBlockingRuntime_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let result = tokio_test::block_on(controller.translate("Hello", Some("de")))?;

    assert_eq!(result.target_lang, "DE");
    assert_eq!(result.translation, "[DE] Hello");
    Ok(())
}

/// Test that an invalid configuration is refused
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.database.backend = StoreBackend::Memory;
    config.default_target_language = "XX".to_string();

    assert!(Controller::with_config(config).is_err());
}

/// Test that cached translations outlive the controller
#[tokio::test]
async fn test_sqliteController_afterRestart_shouldServeFromCache() -> Result<()> {
    let dir = common::create_temp_dir()?;

    {
        let controller = Controller::with_config(sqlite_mock_config(&dir))?;
        controller.startup().await;
        let result = controller.translate("Hello", Some("fr")).await?;
        assert!(!result.cached);
        controller.shutdown().await?;
    }

    let controller = Controller::with_config(sqlite_mock_config(&dir))?;
    let result = controller.translate("Hello", Some("FR")).await?;
    assert!(result.cached);
    assert_eq!(result.translation, "[FR] Hello");

    let stats = controller.cache_stats().await?;
    assert_eq!(stats.total_entries, 1);
    controller.shutdown().await?;
    Ok(())
}

/// Test that translation keeps working after the store is closed
#[tokio::test]
async fn test_controller_afterShutdown_shouldFailOpen() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = Controller::with_config(sqlite_mock_config(&dir))?;
    controller.shutdown().await?;

    let result = controller.translate("Hello", None).await?;
    assert!(!result.cached);
    assert!(controller.cache_stats().await.is_err());
    Ok(())
}

/// Test the environment check against a DeepL stand-in
#[tokio::test]
async fn test_checkEnvironment_withDeepLStandIn_shouldReportUsage() -> Result<()> {
    let server = MockDeepL::start(DeepLBehavior::Translate).await;
    let mut config = Config::default();
    config.database.backend = StoreBackend::Memory;
    config.provider.api_key = "test-key".to_string();
    config.provider.endpoint = server.endpoint.clone();

    let controller = Controller::with_config(config)?;
    let report = controller.check_environment().await;

    assert!(report.all_passed(), "{:?}", report);
    let account = report
        .items
        .iter()
        .find(|item| item.name == "provider account")
        .expect("account check present");
    assert!(account.detail.contains("1234"));
    Ok(())
}

/// Test that a missing key fails the environment check
#[tokio::test]
async fn test_checkEnvironment_withoutKey_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.database.backend = StoreBackend::Memory;

    let controller = Controller::with_config(config)?;
    let report = controller.check_environment().await;

    assert!(!report.all_passed());
    let key = report.items.iter().find(|item| item.name == "provider key").unwrap();
    assert!(!key.passed);
    Ok(())
}

/// Test the full stack: HTTP server, SQLite store and DeepL client
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_endToEnd_shouldCacheDeepLTranslations() -> Result<()> {
    let deepl = MockDeepL::start(DeepLBehavior::Translate).await;
    let dir = common::create_temp_dir()?;
    let mut config = sqlite_mock_config(&dir);
    config.provider.kind = ProviderKind::DeepL;
    let store: Arc<dyn TranslationStore> = Arc::new(common::create_file_repository(&dir)?);
    let provider = Arc::new(DeepL::new("test-key", deepl.endpoint.clone(), std::time::Duration::from_secs(5)));
    let controller = Controller::with_components(config, store.clone(), provider);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let state = AppState::new(controller.service().clone());
    let server = tokio::spawn(api::serve_with_listener(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let url = format!("http://{}/api/translate?text=Hello&target_lang=de", addr);

    let first: serde_json::Value = client.get(&url).send().await?.json().await?;
    let second: serde_json::Value = client.get(&url).send().await?.json().await?;

    assert_eq!(first["translation"], "DE:Hello");
    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(deepl.received().len(), 1);
    assert!(store.lookup(&TranslationKey::new("Hello", "DE")).await?.is_some());

    let _ = stop_tx.send(());
    server.await??;
    controller.shutdown().await?;
    Ok(())
}
