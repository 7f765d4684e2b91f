//! Correspondence audit configuration.

use serde::{Deserialize, Serialize};

/// Settings for the best-effort correspondence audit writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrespondenceConfig {
    /// Whether a correspondence record is persisted after each successful
    /// send. Failures of the audit write are logged, never surfaced.
    #[serde(default = "default_true")]
    pub save_correspondence: bool,
    /// Maximum attempts for one audit write.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay for the audit writer's randomized exponential backoff.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

impl Default for CorrespondenceConfig {
    fn default() -> Self {
        Self {
            save_correspondence: default_true(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    500
}
