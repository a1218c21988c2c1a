//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinedeck_api::catalog::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT};
use cinedeck_search::SearchConfig;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search coordinator settings.
    #[serde(default)]
    pub search: SearchSettings,
}

/// TMDB connection configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key (v3 auth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Response language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Search coordinator tuning.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SearchSettings {
    /// Debounce in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    /// Suggestions per search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_limit: Option<usize>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Search coordinator settings with defaults filled in.
    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            debounce: self
                .search
                .debounce_ms
                .map_or(defaults.debounce, Duration::from_millis),
            suggestion_limit: self
                .search
                .suggestion_limit
                .filter(|&limit| limit > 0)
                .unwrap_or(defaults.suggestion_limit),
        }
    }
}

impl TmdbConfig {
    /// Picks the API key: a non-blank `env_value` wins over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a non-blank key.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        let key = env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()));
        match key {
            Some(k) => Ok(k),
            None => bail!("TMDB API key is required (set {API_KEY_ENV} or tmdb.api_key)"),
        }
    }

    /// Base URL, or the public API default.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Response language, or "en-US".
    #[must_use]
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Request timeout, or 10 seconds.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|&secs| secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }
}
