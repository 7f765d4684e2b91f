//! Delivery-window configuration.

use serde::{Deserialize, Serialize};

/// Permitted delivery hours, evaluated in a fixed reference time zone.
///
/// `[start_hour, end_hour)` is "in hours"; anything outside is deferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// First hour (inclusive) at which notifications may be delivered.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Hour (exclusive) at which delivery stops.
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    /// IANA name of the tribunal's reference time zone.
    #[serde(default = "default_zone")]
    pub zone: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            zone: default_zone(),
        }
    }
}

fn default_start_hour() -> u32 {
    9
}

fn default_end_hour() -> u32 {
    17
}

fn default_zone() -> String {
    "Europe/London".to_string()
}
