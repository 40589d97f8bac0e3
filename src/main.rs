// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use lingocache::app_config::{Config, LogLevel};
use lingocache::app_controller::Controller;
use lingocache::language_utils::language_name;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default command)
    Serve,

    /// Translate one text through the cache and print the result as JSON
    Translate {
        /// Text to translate
        #[arg(value_name = "TEXT")]
        text: String,

        /// Target language code (e.g. 'ES', 'fr', 'EN-GB')
        #[arg(short, long)]
        target_lang: Option<String>,
    },

    /// Check configuration, DeepL credential and cache store
    Check,

    /// List supported target languages
    Languages,

    /// Print cache statistics
    Stats,

    /// Generate shell completions for lingocache
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// LingoCache - cached DeepL translation service
///
/// Serves translations from a local cache and only calls DeepL on a miss.
#[derive(Parser, Debug)]
#[command(name = "lingocache")]
#[command(version)]
#[command(about = "Translation service with a persistent cache in front of DeepL")]
#[command(long_about = "LingoCache serves translations from a local SQLite cache and calls DeepL only on a miss.

EXAMPLES:
    lingocache                                  # Run the HTTP API on the configured port
    lingocache --port 9000 serve                # Run the HTTP API on port 9000
    lingocache translate \"Hello\" -t fr          # Translate once through the cache
    lingocache check                            # Verify key, cache store and DeepL account
    lingocache completions bash > lingocache.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. DEEPL_API_KEY, DATABASE_PATH, DB_TYPE and
    LINGOCACHE_PORT override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    db_path: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Trace is the ceiling; the effective level is set once config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Load configuration and apply environment and CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(db_path) = &cli.db_path {
        config.database.path = Some(db_path.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

/// Run the selected command; `Ok(false)` means it completed but failed its checks
async fn run(cli: CommandLineOptions) -> Result<bool> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingocache", &mut std::io::stdout());
        return Ok(true);
    }

    let config = load_config(&cli)?;

    if let Some(Commands::Languages) = &cli.command {
        let languages = config.languages();
        for code in languages.iter() {
            let marker = if code == config.default_target_language { " (default)" } else { "" };
            println!("{:<6} {}{}", code, language_name(code).unwrap_or_default(), marker);
        }
        return Ok(true);
    }

    let controller = Controller::with_config(config)?;
    execute(&controller, cli.command.unwrap_or(Commands::Serve)).await
}

/// Run a store-backed command, closing the store whatever its outcome
async fn execute(controller: &Controller, command: Commands) -> Result<bool> {
    let outcome = match command {
        Commands::Serve => {
            controller.serve().await?;
            return Ok(true);
        }
        Commands::Translate { text, target_lang } => controller
            .translate(&text, target_lang.as_deref())
            .await
            .and_then(|result| Ok(serde_json::to_string_pretty(&result)?))
            .map(|json| {
                println!("{}", json);
                true
            }),
        Commands::Check => {
            let report = controller.check_environment().await;
            for item in &report.items {
                let mark = if item.passed { "✓" } else { "✗" };
                println!("  {} {}: {}", mark, item.name, item.detail);
            }
            if report.all_passed() {
                info!("All checks passed");
            } else {
                error!("Some checks failed");
            }
            Ok(report.all_passed())
        }
        Commands::Stats => {
            let stats = controller.cache_stats().await;
            stats.map(|stats| {
                println!("{}", stats);
                true
            })
        }
        Commands::Languages | Commands::Completions { .. } => Ok(true),
    };

    controller.shutdown().await?;
    outcome
}
