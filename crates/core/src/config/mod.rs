//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MARQUEE_*)
//! 2. TOML config file (if MARQUEE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MARQUEE_*)
/// 2. TOML config file (if MARQUEE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OMDb API key for the primary source.
    ///
    /// Set via MARQUEE_OMDB_API_KEY environment variable.
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb endpoint.
    #[serde(default = "default_omdb_base_url")]
    pub omdb_base_url: String,

    /// TMDB v3 API key for the secondary source.
    ///
    /// Set via MARQUEE_TMDB_API_KEY environment variable.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API root.
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// Prefix for TMDB poster paths.
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// User-Agent string for upstream requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a single upstream HTTP attempt, in milliseconds.
    ///
    /// Set via MARQUEE_SOURCE_TIMEOUT_MS environment variable.
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Deadline for a whole search, in milliseconds.
    ///
    /// Set via MARQUEE_REQUEST_TIMEOUT_MS environment variable.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Lifetime of cached results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached result sets.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Retries for transient upstream failures.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Initial retry backoff in milliseconds, doubled on each attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Latest release year accepted in search requests.
    #[serde(default = "default_max_year")]
    pub max_year: u16,
}

fn default_omdb_base_url() -> String {
    "https://www.omdbapi.com/".into()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".into()
}

fn default_user_agent() -> String {
    "marquee/0.1".into()
}

fn default_source_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    45_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_max_year() -> u16 {
    2025
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            omdb_base_url: default_omdb_base_url(),
            tmdb_api_key: None,
            tmdb_base_url: default_tmdb_base_url(),
            tmdb_image_base_url: default_tmdb_image_base_url(),
            user_agent: default_user_agent(),
            source_timeout_ms: default_source_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            max_year: default_max_year(),
        }
    }
}

impl AppConfig {
    /// Per-attempt timeout as Duration for use with reqwest.
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    /// Time one upstream call may take with every retry and backoff.
    pub fn source_call_budget(&self) -> Duration {
        let attempts = self.source_timeout().saturating_mul(self.retry_count.saturating_add(1));
        let backoff = (0..self.retry_count)
            .map(|n| self.retry_backoff().saturating_mul(2u32.saturating_pow(n)))
            .fold(Duration::ZERO, Duration::saturating_add);
        attempts.saturating_add(backoff)
    }

    /// Deadline for one source's share of a search.
    ///
    /// Covers the search call and the detail enrichment that may follow it,
    /// each with its full retry budget.
    pub fn source_deadline(&self) -> Duration {
        self.source_call_budget().saturating_mul(2)
    }

    /// Whole-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MARQUEE_`
    /// 2. TOML file from `MARQUEE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MARQUEE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MARQUEE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// OMDb key, if configured (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the OMDb API key is not set.
    pub fn require_omdb_api_key(&self) -> Result<&str, ConfigError> {
        self.omdb_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "omdb_api_key".into(),
                hint: "Set MARQUEE_OMDB_API_KEY environment variable".into(),
            })
    }

    /// TMDB key, if configured (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the TMDB API key is not set.
    pub fn require_tmdb_api_key(&self) -> Result<&str, ConfigError> {
        self.tmdb_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "tmdb_api_key".into(),
                hint: "Set MARQUEE_TMDB_API_KEY environment variable".into(),
            })
    }
}
