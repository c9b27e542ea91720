//! Engine configuration loaded from environment variables with defaults.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Reconciliation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Retry attempts allowed for a commit that loses its version race
    pub commit_max_retries: usize,
    /// Initial backoff delay in milliseconds
    pub retry_initial_delay_ms: u64,
    /// Backoff delay cap in milliseconds
    pub retry_max_delay_ms: u64,
    /// Retry attempts allowed for transient gateway failures
    pub gateway_max_retries: usize,
    /// Hours before kickoff after which self-service cancellation closes
    pub cancellation_window_hours: i64,
    /// ISO 4217 currency code charges are denominated in
    pub currency: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl EngineConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            commit_max_retries: env::var("MATCHDAY_COMMIT_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            retry_initial_delay_ms: env::var("MATCHDAY_RETRY_INITIAL_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(25),
            retry_max_delay_ms: env::var("MATCHDAY_RETRY_MAX_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            gateway_max_retries: env::var("MATCHDAY_GATEWAY_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            cancellation_window_hours: env::var("MATCHDAY_CANCELLATION_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(matchday_core::CANCELLATION_WINDOW_HOURS),
            currency: env::var("MATCHDAY_CURRENCY").unwrap_or_else(|_| "cad".to_string()),
            log_level: env::var("MATCHDAY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// The backoff policy for versioned commits
    #[must_use]
    pub fn commit_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.commit_max_retries,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            multiplier: 2.0,
        }
    }

    /// The backoff policy for transient gateway failures
    #[must_use]
    pub fn gateway_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.gateway_max_retries,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            multiplier: 2.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_max_retries: 5,
            retry_initial_delay_ms: 25,
            retry_max_delay_ms: 1000,
            gateway_max_retries: 2,
            cancellation_window_hours: matchday_core::CANCELLATION_WINDOW_HOURS,
            currency: "cad".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_from_env_without_overrides() {
        let defaults = EngineConfig::default();
        assert_eq!(defaults.commit_max_retries, 5);
        assert_eq!(defaults.currency, "cad");
        assert_eq!(defaults.cancellation_window_hours, 24);
        let policy = defaults.commit_retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(25));
    }
}
