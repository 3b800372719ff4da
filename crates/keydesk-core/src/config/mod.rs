//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod access;
pub mod allocator;
pub mod ledger;
pub mod logging;
pub mod telegram;

use serde::{Deserialize, Serialize};

use self::access::AccessConfig;
use self::allocator::AllocatorConfig;
use self::ledger::LedgerConfig;
use self::logging::LoggingConfig;
use self::telegram::TelegramConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Requester allow-list settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// External key ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Allocation engine settings.
    #[serde(default)]
    pub allocator: AllocatorConfig,
    /// Chat transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `KEYDESK`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEYDESK")
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
