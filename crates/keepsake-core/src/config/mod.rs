//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod book;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::book::{BookConfig, GroupOrder};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Deserialized from `config/default.toml`, an environment overlay
/// `config/{env}.toml`, and `KEEPSAKE__*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relational backend settings.
    pub database: DatabaseConfig,
    /// Photo blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Credential policy.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Book pagination and reflow tunables.
    #[serde(default)]
    pub book: BookConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default`, `config/{env}`, and environment variables
    /// prefixed with `KEEPSAKE` (nested keys separated by `__`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEEPSAKE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "postgres://keepsake@localhost/keepsake"
            "#,
        )
        .expect("minimal config should parse");

        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.book.default_layout, 6);
        assert_eq!(config.book.mobile_breakpoint_px, 768);
        assert_eq!(config.book.reflow_settle_ms, 100);
        assert_eq!(config.book.reflow_fallback_ms, 300);
        assert_eq!(config.book.group_order, GroupOrder::FirstSeen);
        assert_eq!(config.auth.password_min_length, 6);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_group_order_parses_snake_case() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "postgres://localhost/keepsake"

            [book]
            group_order = "chronological"
            default_layout = 9
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.book.group_order, GroupOrder::Chronological);
        assert_eq!(config.book.default_layout, 9);
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let err = AppConfig::from_toml_str("[book]\ndefault_layout = 1\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
