//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `NEOTERIK__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, Environment, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment; decides cookie transport security.
    #[serde(default)]
    pub environment: Environment,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// User store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential and session signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `NEOTERIK__` (e.g.
    /// `NEOTERIK__AUTH__SESSION_SECRET`). Missing files are skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_with(env, env_source())
    }

    /// Same as [`load`](Self::load), reading variables from `vars`.
    fn load_with(env: &str, vars: config::Environment) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(vars)
            .set_override("environment", env)?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Whether this process runs with production transport security.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// `NEOTERIK__SECTION__KEY` variables, e.g. `NEOTERIK__SERVER__PORT=9000`.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("NEOTERIK")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
