//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod cache;
pub mod database;
pub mod events;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::events::{EventsConfig, TransportFailurePolicy};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Plain environment variables honoured for compatibility with existing
/// deployments, mapped onto their configuration keys.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("REDIS_URL", "cache.redis.url"),
    ("DATABASE_URL", "database.url"),
    ("DATABASE_DRIVER", "database.driver"),
    ("ADDR", "server.addr"),
];

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Durable user store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Session token settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Pub/sub event bridge settings.
    #[serde(default)]
    pub events: EventsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay,
    /// environment variables prefixed with `TANA__`, and finally the plain
    /// `REDIS_URL` / `DATABASE_URL` / `DATABASE_DRIVER` / `ADDR` variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TANA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
