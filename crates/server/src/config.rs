//! Configuration management for the dirindex server.
//!
//! This module provides TOML-based configuration file loading and printing.
//! The default configuration path is `~/.config/dirindex/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use listing::IgnoreSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("port must be greater than 0")]
    InvalidPort,

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),

    #[error("default_language must be a two-letter code, got {0}")]
    InvalidDefaultLanguage(String),

    #[error("theme_color must not be empty")]
    EmptyThemeColor,

    #[error("{field} must start with http:// or https://, got {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the dirindex server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Listener and logging configuration.
    pub server: ServerConfig,

    /// What is served and how it is filtered.
    pub files: FilesConfig,

    /// Presentation settings for the listing page.
    pub page: PageConfig,
}

/// Listener and logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Served tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory to serve. Canonicalized at startup.
    pub root: PathBuf,

    /// Names hidden from listings and refused for download.
    pub ignore_files: Vec<String>,

    /// Directory holding `{code}.toml` translation files.
    pub languages_dir: PathBuf,

    /// Language used when the request names none.
    pub default_language: String,
}

/// Listing page settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// CSS font-family for the page body.
    pub font_family: String,

    /// Value of the `theme-color` meta tag.
    pub theme_color: String,

    /// Upstream favicon URL, proxied at `/favicon.ico`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    /// When set, errors redirect to `{error_page_base}/{status}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_base: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore_files: Vec::new(),
            languages_dir: PathBuf::from("languages"),
            default_language: "en".to_string(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            theme_color: "#007bff".to_string(),
            favicon: None,
            error_page_base: None,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dirindex")
        .join("config.toml")
}

/// Read a non-empty environment variable.
fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl Config {
    /// Log level the process should start with: `DIRINDEX_LOG_LEVEL` if
    /// set, otherwise the configured one. Lower-cased.
    pub fn effective_log_level(&self) -> String {
        env_override("DIRINDEX_LOG_LEVEL")
            .unwrap_or_else(|| self.server.log_level.clone())
            .to_lowercase()
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Empty values are ignored. Supported variables:
    /// - DIRINDEX_HOST, DIRINDEX_PORT, DIRINDEX_LOG_LEVEL
    /// - DIRINDEX_ROOT, DIRINDEX_IGNORE_FILES (comma-separated)
    /// - DIRINDEX_FONT_FAMILY, DIRINDEX_THEME_COLOR, DIRINDEX_FAVICON
    /// - DIRINDEX_ERROR_PAGE_BASE
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = env_override("DIRINDEX_HOST") {
            tracing::info!("Overriding host from environment: {}", host);
            self.server.host = host;
        }

        if let Some(port) = env_override("DIRINDEX_PORT") {
            match port.parse() {
                Ok(port) => {
                    tracing::info!("Overriding port from environment: {}", port);
                    self.server.port = port;
                }
                Err(_) => tracing::warn!("Ignoring invalid DIRINDEX_PORT: {}", port),
            }
        }

        if let Some(level) = env_override("DIRINDEX_LOG_LEVEL") {
            tracing::info!("Overriding log_level from environment: {}", level);
            self.server.log_level = level;
        }

        if let Some(root) = env_override("DIRINDEX_ROOT") {
            tracing::info!("Overriding root from environment: {}", root);
            self.files.root = PathBuf::from(root);
        }

        if let Some(list) = env_override("DIRINDEX_IGNORE_FILES") {
            self.files.ignore_files = list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
            tracing::info!(
                "Overriding ignore_files from environment ({} names)",
                self.files.ignore_files.len()
            );
        }

        if let Some(font) = env_override("DIRINDEX_FONT_FAMILY") {
            self.page.font_family = font;
        }

        if let Some(color) = env_override("DIRINDEX_THEME_COLOR") {
            self.page.theme_color = color;
        }

        if let Some(favicon) = env_override("DIRINDEX_FAVICON") {
            self.page.favicon = Some(favicon);
        }

        if let Some(base) = env_override("DIRINDEX_ERROR_PAGE_BASE") {
            self.page.error_page_base = Some(base);
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let level = self.server.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.server.log_level.clone()));
        }

        let lang = &self.files.default_language;
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidDefaultLanguage(lang.clone()));
        }

        if self.page.theme_color.trim().is_empty() {
            return Err(ConfigError::EmptyThemeColor);
        }

        if let Some(favicon) = &self.page.favicon {
            if !is_http_url(favicon) {
                return Err(ConfigError::InvalidUrl {
                    field: "favicon",
                    value: favicon.clone(),
                });
            }
        }

        if let Some(base) = &self.page.error_page_base {
            if !is_http_url(base) {
                return Err(ConfigError::InvalidUrl {
                    field: "error_page_base",
                    value: base.clone(),
                });
            }
        }

        Ok(())
    }

    /// The configured ignore list as a lookup set.
    pub fn ignore_set(&self) -> IgnoreSet {
        self.files
            .ignore_files
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
