/*!
 * Tests for application configuration functionality
 */

use std::collections::HashMap;
use std::path::PathBuf;

use lingocache::app_config::{Config, LogLevel, ProviderKind, StoreBackend};
use crate::common;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.database.backend, StoreBackend::Sqlite);
    assert_eq!(config.database.timeout_ms, 2000);
    assert_eq!(config.provider.kind, ProviderKind::DeepL);
    assert_eq!(config.provider.timeout_secs, 15);
    assert_eq!(config.default_target_language, "ES");
    assert!(config.supported_languages.iter().any(|code| code == "PT-BR"));
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a missing file is created with defaults and read back
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.server.port, created.server.port);
    assert_eq!(loaded.supported_languages, created.supported_languages);
    Ok(())
}

/// Test that a partial file keeps defaults for everything it omits
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{"database": {"backend": "memory"}, "provider": {"type": "mock"}}"#)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.database.backend, StoreBackend::Memory);
    assert_eq!(config.database.timeout_ms, 2000);
    assert_eq!(config.provider.kind, ProviderKind::Mock);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that an unparseable file is an error, not a silent default
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test environment overrides
#[test]
fn test_applyOverrides_withAllVariables_shouldOverrideFile() -> anyhow::Result<()> {
    let mut config = Config::default();

    config.apply_overrides(lookup_from(&[
        ("DEEPL_API_KEY", " key-123:fx "),
        ("DATABASE_PATH", "/tmp/lingocache-test.db"),
        ("DB_TYPE", "Memory"),
        ("LINGOCACHE_PORT", "9001"),
    ]))?;

    assert_eq!(config.provider.api_key, "key-123:fx");
    assert_eq!(config.provider.get_endpoint(), "https://api-free.deepl.com");
    assert_eq!(config.database.path, Some(PathBuf::from("/tmp/lingocache-test.db")));
    assert_eq!(config.database.backend, StoreBackend::Memory);
    assert_eq!(config.server.port, 9001);
    Ok(())
}

/// Test that bad override values are rejected
#[test]
fn test_applyOverrides_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    assert!(config.apply_overrides(lookup_from(&[("DB_TYPE", "mongodb")])).is_err());

    let mut config = Config::default();
    assert!(config.apply_overrides(lookup_from(&[("LINGOCACHE_PORT", "eighty")])).is_err());
}

/// Test configuration validation
#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.default_target_language = "XX".to_string();
    assert!(config.validate().is_err());
    config.default_target_language = "ES".to_string();

    config.supported_languages = vec!["ES".to_string(), "spanish".to_string()];
    assert!(config.validate().is_err());
    config.supported_languages = vec!["ES".to_string()];
    assert!(config.validate().is_ok());

    config.provider.endpoint = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
    config.provider.endpoint = "http://127.0.0.1:9000".to_string();
    assert!(config.validate().is_ok());

    config.database.timeout_ms = 0;
    assert!(config.validate().is_err());
}

/// Test that a missing API key does not invalidate the configuration
#[test]
fn test_validate_withoutApiKey_shouldStillPass() {
    let config = Config::default();
    assert!(!config.provider.is_configured());
    assert!(config.validate().is_ok());
}

/// Test database path resolution
#[test]
fn test_databasePath_withoutExplicitPath_shouldUseDataDirectory() -> anyhow::Result<()> {
    let mut config = Config::default();
    let resolved = config.database_path()?;
    assert!(resolved.ends_with("lingocache/lingocache.db"));

    config.database.path = Some(PathBuf::from("custom.db"));
    assert_eq!(config.database_path()?, PathBuf::from("custom.db"));
    Ok(())
}
