//! Polling configuration for long-running operations
//!
//! Stored per profile. Unset delays defer to the server's `Retry-After`
//! header and then to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay before the first status poll when the server gives no hint
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(30);

/// Delay between subsequent polls when the server gives no hint
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15);

/// Polling settings for long-running operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRunningConfig {
    /// Forces the delay before the first poll, ignoring `Retry-After`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_secs: Option<u64>,

    /// Forces the delay between polls, ignoring `Retry-After`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,

    /// Maximum time to wait for a terminal status
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LongRunningConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: None,
            retry_delay_secs: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LongRunningConfig {
    /// Delay before the first poll, given the server's `Retry-After` (seconds)
    pub fn initial_delay(&self, retry_after: Option<u64>) -> Duration {
        pick_delay(self.initial_delay_secs, retry_after, DEFAULT_INITIAL_DELAY)
    }

    /// Delay between polls, given the server's latest `Retry-After` (seconds)
    pub fn retry_delay(&self, retry_after: Option<u64>) -> Duration {
        pick_delay(self.retry_delay_secs, retry_after, DEFAULT_RETRY_DELAY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Config that polls immediately; used by tests and `--wait-interval 0`
    pub fn immediate(timeout: Duration) -> Self {
        Self {
            initial_delay_secs: Some(0),
            retry_delay_secs: Some(0),
            timeout_secs: timeout.as_secs(),
        }
    }
}

fn pick_delay(forced: Option<u64>, retry_after: Option<u64>, fallback: Duration) -> Duration {
    match (forced, retry_after) {
        (Some(secs), _) => Duration::from_secs(secs),
        (None, Some(secs)) if secs > 0 => Duration::from_secs(secs),
        _ => fallback,
    }
}

fn default_timeout_secs() -> u64 {
    1800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LongRunningConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(1800));
        assert_eq!(config.initial_delay(None), DEFAULT_INITIAL_DELAY);
        assert_eq!(config.retry_delay(None), DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn test_retry_after_used_when_not_forced() {
        let config = LongRunningConfig::default();
        assert_eq!(config.initial_delay(Some(5)), Duration::from_secs(5));
        assert_eq!(config.retry_delay(Some(7)), Duration::from_secs(7));
        // Zero means "no hint"
        assert_eq!(config.retry_delay(Some(0)), DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn test_forced_delays_win() {
        let config = LongRunningConfig {
            initial_delay_secs: Some(1),
            retry_delay_secs: Some(2),
            timeout_secs: 60,
        };
        assert_eq!(config.initial_delay(Some(30)), Duration::from_secs(1));
        assert_eq!(config.retry_delay(Some(30)), Duration::from_secs(2));
    }

    #[test]
    fn test_toml_defaults() {
        let config: LongRunningConfig = toml::from_str("").unwrap();
        assert_eq!(config, LongRunningConfig::default());

        let config: LongRunningConfig = toml::from_str("retry_delay_secs = 3").unwrap();
        assert_eq!(config.retry_delay_secs, Some(3));
        assert_eq!(config.timeout_secs, 1800);
    }
}
