//! Configuration file parser for `scribe.toml`.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos. Environment variables override file values.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Unsupported database URL '{0}': only sqlite URLs are supported")]
    UnsupportedDatabase(String),

    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name reported in the startup log line.
    pub app_name: String,

    /// Interface to bind.
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// SQLite database file, or `:memory:`.
    pub database_path: String,

    /// Lower the default log level to `debug` (ignored when `RUST_LOG` is set).
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "My Professional Blog API".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_path: "blog.db".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = ["app_name", "host", "port", "database_path", "debug"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Override file values with environment variables.
    ///
    /// `lookup` is `|name| std::env::var(name).ok()` in production; tests pass
    /// a map instead. Recognised variables: `DATABASE_URL`, `APP_HOST`,
    /// `APP_PORT`, `DEBUG_MODE`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_path = database_path_from_url(url.trim())?;
        }
        if let Some(host) = lookup("APP_HOST").filter(|v| !v.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = lookup("APP_PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "APP_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(debug) = lookup("DEBUG_MODE") {
            self.debug = matches!(debug.trim(), "True" | "true" | "1");
        }
        Ok(())
    }
}

/// Load `KEY=VALUE` pairs from a dotenv file into the process environment.
///
/// Variables that are already set keep their value. Returns `Ok(false)`
/// when the file does not exist.
pub fn load_dotenv(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Extract a filesystem path from a SQLite URL.
///
/// Accepts `sqlite:path`, `sqlite://path`, `sqlite:///path` (relative to the
/// working directory, so `sqlite:////abs` is absolute) and bare paths. Query
/// strings are dropped; the store always opens in read-write-create mode.
pub fn database_path_from_url(url: &str) -> Result<String, ConfigError> {
    let rest = ["sqlite:///", "sqlite://", "sqlite:"]
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix));

    let path = match rest {
        Some(rest) => rest,
        None if url.contains("://") => {
            return Err(ConfigError::UnsupportedDatabase(url.to_string()));
        }
        None => url,
    };
    let path = path.split('?').next().unwrap_or_default();

    if path.is_empty() {
        return Err(ConfigError::UnsupportedDatabase(url.to_string()));
    }
    Ok(path.to_string())
}

// ============================================================================
// Tests
// ============================================================================
