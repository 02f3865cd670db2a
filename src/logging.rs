//! Logging System
//!
//! Structured logging implementation using the `tracing` crate. Provides
//! configurable log levels, output formats, and destinations.

use crate::error::ListError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Build the env filter from the `SHELFTREE_LOG` environment variable if set,
/// otherwise from the configured base level plus module overrides.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ListError> {
    if let Ok(env) = std::env::var("SHELFTREE_LOG") {
        if !env.is_empty() {
            return EnvFilter::try_new(&env)
                .map_err(|e| ListError::Config(format!("SHELFTREE_LOG: {}", e)));
        }
    }
    let mut directives = config.level.clone();
    for (module, level) in &config.modules {
        directives.push_str(&format!(",{}={}", module, level));
    }
    EnvFilter::try_new(&directives).map_err(|e| ListError::Config(format!("log level: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ListError> {
    let path = config
        .file
        .clone()
        .ok_or_else(|| ListError::Config("log output is file but no file path set".to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ListError::Config(format!("log directory: {}", e)))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ListError::Config(format!("log file {}: {}", path.display(), e)))
}

/// Initialize the logging system.
///
/// `None` uses the default configuration. Returns an error if a subscriber
/// is already installed or the configuration is invalid.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ListError> {
    let default_config = LoggingConfig::default();
    let config = config.unwrap_or(&default_config);
    if !config.enabled {
        return Ok(());
    }

    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    let json = config.format.eq_ignore_ascii_case("json");

    let result = match config.output.as_str() {
        "stdout" => {
            if json {
                registry
                    .with(fmt::layer().json().with_writer(std::io::stdout))
                    .try_init()
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_ansi(config.color)
                            .with_writer(std::io::stdout),
                    )
                    .try_init()
            }
        }
        "stderr" => {
            if json {
                registry
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init()
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_ansi(config.color)
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            }
        }
        "file" => {
            let writer = Mutex::new(open_log_file(config)?);
            if json {
                registry
                    .with(fmt::layer().json().with_writer(writer))
                    .try_init()
            } else {
                registry
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .try_init()
            }
        }
        "file+stderr" => {
            let writer = std::io::stderr.and(Mutex::new(open_log_file(config)?));
            if json {
                registry
                    .with(fmt::layer().json().with_writer(writer))
                    .try_init()
            } else {
                registry
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .try_init()
            }
        }
        other => {
            return Err(ListError::Config(format!("unknown log output: {}", other)));
        }
    };
    result.map_err(|e| ListError::Config(format!("logging init: {}", e)))
}
