use anyhow::{Context, Result};
use log::{error, info, warn};
use std::sync::Arc;

use crate::api::{self, AppState};
use crate::app_config::{Config, ProviderKind};
use crate::database::{self, CacheStats, MemoryStore, TranslationStore};
use crate::providers::mock::MockProvider;
use crate::providers::{self, TranslationProvider};
use crate::translation::{TranslationResult, TranslationService};

// @module: Application controller for the translation cache service

/// Outcome of one environment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    // @field: Short check name
    pub name: String,
    // @field: Whether the check passed
    pub passed: bool,
    // @field: Human-readable detail
    pub detail: String,
}

/// Result of `Controller::check_environment`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub items: Vec<CheckItem>,
}

impl EnvironmentReport {
    fn push(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        });
    }

    /// Whether every check passed
    pub fn all_passed(&self) -> bool {
        self.items.iter().all(|item| item.passed)
    }
}

/// Main application controller: owns the configuration and the service graph
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Cache-aside translation service
    service: TranslationService,
}

impl Controller {
    /// Create a controller backed by an in-memory store and a mock provider
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.provider.kind = ProviderKind::Mock;

        Ok(Self::with_components(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MockProvider::working()),
        ))
    }

    // @method: Create a controller, opening the store and provider named by the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let store = database::open_store(&config).context("Failed to open translation cache")?;
        let provider = providers::create_provider(&config.provider);

        Ok(Self::with_components(config, store, provider))
    }

    // @method: Create a controller from already built components
    pub fn with_components(
        config: Config,
        store: Arc<dyn TranslationStore>,
        provider: Arc<dyn TranslationProvider>,
    ) -> Self {
        let service = TranslationService::new(store, provider, config.languages(), config.database.timeout())
            .with_default_target_language(&config.default_target_language)
            .with_provider_timeout(config.provider.timeout());

        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Verify the store on startup
    ///
    /// A store that does not answer is reported but does not prevent
    /// startup: requests then degrade to provider calls.
    pub async fn startup(&self) {
        let backend = self.service.store().backend_name();

        if self.service.store_connected().await {
            info!("Translation cache ready ({})", backend);
        } else {
            error!("Translation cache ({}) is not reachable; serving without cache", backend);
        }

        if !self.service.provider().is_configured() {
            warn!("DeepL API key is not configured; uncached translations will fail");
        }
    }

    /// Release the store
    pub async fn shutdown(&self) -> Result<()> {
        self.service
            .store()
            .close()
            .await
            .context("Failed to close translation cache")?;
        info!("Translation cache closed");
        Ok(())
    }

    /// Translate one text through the cache
    pub async fn translate(&self, text: &str, target_language: Option<&str>) -> Result<TranslationResult> {
        let target = target_language.unwrap_or(self.service.default_target_language());
        Ok(self.service.get_translation(text, target).await?)
    }

    /// Store statistics
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        Ok(self.service.cache_stats().await?)
    }

    /// Check configuration, credential, store and provider account
    pub async fn check_environment(&self) -> EnvironmentReport {
        let mut report = EnvironmentReport::default();

        match self.config.validate() {
            Ok(()) => report.push("configuration", true, "Configuration is valid"),
            Err(e) => report.push("configuration", false, format!("{:#}", e)),
        }

        let provider = self.service.provider();
        if provider.is_configured() {
            report.push("provider key", true, format!("{} credential configured", provider.name()));
        } else {
            report.push(
                "provider key",
                false,
                "DEEPL_API_KEY is not set (environment or config file)",
            );
        }

        let (store_connected, usage) = futures::join!(self.service.store_connected(), async {
            if provider.is_configured() {
                Some(provider.usage().await)
            } else {
                None
            }
        });

        let backend = self.service.store().backend_name();
        if store_connected {
            report.push("store", true, format!("{} store is reachable", backend));
        } else {
            report.push("store", false, format!("{} store is not reachable", backend));
        }

        if let Some(usage) = usage {
            match usage {
                Ok(Some(usage)) => {
                    let detail = match usage.character_limit {
                        Some(limit) => format!("Usage: {} / {} characters", usage.character_count, limit),
                        None => format!("Usage: {} characters (unlimited plan)", usage.character_count),
                    };
                    report.push("provider account", true, detail);
                }
                Ok(None) => report.push("provider account", true, "Provider does not report usage"),
                Err(e) => report.push("provider account", false, e.to_string()),
            }
        }

        report
    }

    /// Run the HTTP server until Ctrl-C, then close the store
    pub async fn serve(&self) -> Result<()> {
        self.startup().await;

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let state = AppState::new(self.service.clone());

        let served = api::serve(&addr, state, shutdown_signal()).await;
        let closed = self.shutdown().await;

        served?;
        closed
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
