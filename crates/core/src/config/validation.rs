//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::movie::MIN_YEAR;
use thiserror::Error;

/// Longest accepted cache lifetime: one week.
const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < 100 {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > 300_000 {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - either timeout is less than 100ms or exceeds 5 minutes
    /// - `cache_ttl_secs` or `cache_max_entries` is 0
    /// - `cache_ttl_secs` exceeds one week
    /// - `retry_count` exceeds 10
    /// - `user_agent` is empty
    /// - `max_year` is before 1900
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_timeout("source_timeout_ms", self.source_timeout_ms)?;
        check_timeout("request_timeout_ms", self.request_timeout_ms)?;

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: format!("must not exceed one week ({MAX_CACHE_TTL_SECS}s)"),
            });
        }

        if self.cache_max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.retry_count > 10 {
            return Err(ConfigError::Invalid { field: "retry_count".into(), reason: "must not exceed 10".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_year < MIN_YEAR {
            return Err(ConfigError::Invalid {
                field: "max_year".into(),
                reason: format!("must not be before {MIN_YEAR}"),
            });
        }

        if self.request_timeout() < self.source_deadline() {
            tracing::warn!(
                request_timeout_ms = self.request_timeout_ms,
                source_deadline = ?self.source_deadline(),
                "request_timeout_ms is shorter than a source's retry budget; \
                 slow sources will fail the whole request"
            );
        }

        Ok(())
    }
}
