//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod correspondence;
pub mod features;
pub mod logging;
pub mod provider;
pub mod retry;
pub mod window;

use serde::{Deserialize, Serialize};

use self::correspondence::CorrespondenceConfig;
use self::features::FeaturesConfig;
use self::logging::LoggingConfig;
use self::provider::ProviderConfig;
use self::retry::RetryConfig;
use self::window::WindowConfig;

use crate::error::NotifyError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Delivery-window settings.
    #[serde(default)]
    pub window: WindowConfig,
    /// Retry and deferral settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Delivery provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Correspondence audit settings.
    #[serde(default)]
    pub correspondence: CorrespondenceConfig,
    /// Feature flags.
    #[serde(default)]
    pub features: FeaturesConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NotifyConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `NOTIFY_`.
    pub fn load(env: &str) -> Result<Self, NotifyError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NOTIFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| NotifyError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| NotifyError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
