//! Feature flags.

use serde::{Deserialize, Serialize};

/// Runtime feature switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Kill switch for hearing-booked and hearing-reminder notifications.
    /// When disabled, those events are rejected at the eligibility gate.
    #[serde(default = "default_true")]
    pub hearing_notifications_enabled: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            hearing_notifications_enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
