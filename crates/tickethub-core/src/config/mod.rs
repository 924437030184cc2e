//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod notify;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::notify::NotifyConfig;

use crate::error::AppError;

/// Root client configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Platform endpoint settings.
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Notification subsystem settings.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Platform endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the TicketHub REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// URL of the push channel endpoint.
    #[serde(default = "default_push_url")]
    pub push_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            push_url: default_push_url(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TICKETHUB_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TICKETHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_api_base() -> String {
    "https://api.tickethub.local/api".to_string()
}

fn default_push_url() -> String {
    "wss://api.tickethub.local/ws/notifications".to_string()
}
