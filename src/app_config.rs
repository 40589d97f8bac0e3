use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::language_utils::{self, LanguageSet, DEFAULT_SUPPORTED_LANGUAGES, DEFAULT_TARGET_LANGUAGE};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Cache store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Translation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Target language used when a request does not specify one
    #[serde(default = "default_target_language")]
    pub default_target_language: String,

    /// Target languages accepted by the service
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Cache store backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    // @backend: SQLite file (persistent)
    #[default]
    Sqlite,
    // @backend: In-process map (lost on restart)
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(anyhow!("Unsupported database type: {}", s)),
        }
    }
}

/// Cache store configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Store backend
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file path; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Upper bound for a single store operation, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Store operation timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: DeepL
    #[default]
    DeepL,
    // @provider: Offline mock (development only)
    Mock,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeepL => write!(f, "deepl"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub kind: ProviderKind,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL (derived from the key when empty)
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Whether a credential is present
    pub fn is_configured(&self) -> bool {
        match self.kind {
            ProviderKind::DeepL => !self.api_key.trim().is_empty(),
            ProviderKind::Mock => true,
        }
    }

    /// Get the endpoint, deriving it from the key type when not set
    ///
    /// DeepL free-tier keys end in `:fx` and are served from a separate host.
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.trim().is_empty() {
            return self.endpoint.trim().trim_end_matches('/').to_string();
        }

        if self.api_key.trim().ends_with(":fx") {
            default_deepl_free_endpoint()
        } else {
            default_deepl_endpoint()
        }
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_store_timeout_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_deepl_endpoint() -> String {
    "https://api.deepl.com".to_string()
}

fn default_deepl_free_endpoint() -> String {
    "https://api-free.deepl.com".to_string()
}

fn default_target_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_supported_languages() -> Vec<String> {
    DEFAULT_SUPPORTED_LANGUAGES.clone()
}

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "lingocache.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "lingocache";

impl Config {
    /// Load configuration from a JSON file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            info!("Loaded configuration from {:?}", config_path);
            Ok(config)
        } else {
            warn!("Config file not found at {:?}, creating default config.", config_path);

            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;

            std::fs::write(config_path, config_json)
                .with_context(|| format!("Failed to write default config to file: {:?}", config_path))?;

            Ok(config)
        }
    }

    /// Apply overrides from environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    ///
    /// Recognized variables: `DEEPL_API_KEY`, `DATABASE_PATH`, `DB_TYPE`, `LINGOCACHE_PORT`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("DEEPL_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.provider.api_key = api_key.trim().to_string();
        }

        if let Some(path) = lookup("DATABASE_PATH").filter(|v| !v.trim().is_empty()) {
            self.database.path = Some(PathBuf::from(path.trim()));
        }

        if let Some(backend) = lookup("DB_TYPE").filter(|v| !v.trim().is_empty()) {
            self.database.backend = backend.parse()?;
        }

        if let Some(port) = lookup("LINGOCACHE_PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid LINGOCACHE_PORT value: {}", port))?;
        }

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.supported_languages.is_empty() {
            return Err(anyhow!("At least one supported language is required"));
        }

        for code in &self.supported_languages {
            let normalized = language_utils::normalize_language_code(code);
            if !language_utils::is_well_formed(&normalized) {
                return Err(anyhow!("Malformed language code in supported_languages: '{}'", code));
            }
        }

        if !self.languages().contains(&self.default_target_language) {
            return Err(anyhow!(
                "Default target language '{}' is not in supported_languages",
                self.default_target_language
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be non-zero"));
        }

        if self.database.timeout_ms == 0 {
            return Err(anyhow!("Database timeout must be non-zero"));
        }

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be non-zero"));
        }

        if !self.provider.endpoint.trim().is_empty() {
            let endpoint = url::Url::parse(self.provider.endpoint.trim())
                .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
            if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
                return Err(anyhow!("Provider endpoint must use http or https: {}", endpoint));
            }
        }

        Ok(())
    }

    /// Supported target languages as a validation set
    pub fn languages(&self) -> LanguageSet {
        LanguageSet::new(&self.supported_languages)
    }

    /// Resolve the database path, falling back to the platform data directory
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            provider: ProviderConfig::default(),
            default_target_language: default_target_language(),
            supported_languages: default_supported_languages(),
            log_level: LogLevel::default(),
        }
    }
}
