//! Retry and deferral configuration.

use serde::{Deserialize, Serialize};

/// Provider-error retry budget and backoff schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of provider-error-triggered reschedules permitted per
    /// notification. A retry counter above this terminates the chain.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff delay in seconds, indexed by the current retry counter.
    /// Lookups past the end of the table saturate at the last entry.
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: Vec<u64>,
    /// Offset in seconds used to compute the "appeal respond by" date
    /// injected into letter placeholders.
    #[serde(default = "default_response_delay")]
    pub response_delay_seconds: i64,
}

impl RetryConfig {
    /// Backoff delay for a given retry counter, saturating at the table end.
    pub fn backoff_for(&self, retry: u32) -> u64 {
        if self.backoff_seconds.is_empty() {
            return 0;
        }
        let index = (retry as usize).min(self.backoff_seconds.len() - 1);
        self.backoff_seconds[index]
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_seconds: default_backoff_seconds(),
            response_delay_seconds: default_response_delay(),
        }
    }
}

fn default_max_retries() -> u32 {
    6
}

fn default_backoff_seconds() -> Vec<u64> {
    vec![0, 60, 300, 900, 3600, 7200, 14400]
}

fn default_response_delay() -> i64 {
    // Seven days, matching the respondent's reply window.
    7 * 24 * 60 * 60
}
