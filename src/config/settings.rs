//! Configuration settings structures for course-registry
//!
//! Every section deserializes from TOML and environment variables, with
//! defaults for any key that is left out.

use serde::{Deserialize, Serialize};

use crate::logger::LoggerConfig;
use crate::query::PageResolver;

fn default_app_name() -> String {
    "course-registry".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_per_page() -> i64 {
    10
}

fn default_max_per_page() -> i64 {
    100
}

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

/// PostgreSQL pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Apply pending migrations before the server starts listening
    #[serde(default)]
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// The URL with any password replaced, for logging.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.rsplit_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{}://{}:***@{}", scheme, user, host)
            }
            None => self.url.clone(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

/// Page sizing for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the caller gives none, or a non-positive one
    #[serde(default = "default_per_page")]
    pub default_per_page: i64,

    /// Upper bound on the page size; `0` disables the cap
    #[serde(default = "default_max_per_page")]
    pub max_per_page: i64,
}

impl PaginationConfig {
    pub fn resolver(&self) -> PageResolver {
        PageResolver::new(self.default_per_page).with_max_per_page(self.max_per_page)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub logger: LoggerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogFormat, RotationStrategy, TimeUnit};
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "course-registry");
        assert_eq!(settings.server.address(), "127.0.0.1:3000");
        assert_eq!(settings.database.max_connections, 10);
        assert!(!settings.database.auto_migrate);
        assert_eq!(settings.pagination.default_per_page, 10);
        assert_eq!(settings.pagination.max_per_page, 100);
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            port = 8080

            [pagination]
            default_per_page = 25
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.pagination.default_per_page, 25);
        assert_eq!(settings.pagination.max_per_page, 100);
    }

    #[test]
    fn test_deserialize_full() {
        let settings: Settings = toml::from_str(
            r#"
            [application]
            name = "registry"
            version = "2.0.0"

            [server]
            host = "0.0.0.0"
            port = 9000
            request_timeout = 10
            keep_alive_timeout = 20

            [database]
            url = "postgres://registry:secret@db/registry"
            max_connections = 20
            min_connections = 2
            connection_timeout = 5
            auto_migrate = true

            [pagination]
            default_per_page = 20
            max_per_page = 0

            [logger]
            level = "debug"

            [logger.console]
            enabled = false

            [logger.file]
            enabled = true
            path = "/var/log/registry.log"
            format = "json"

            [logger.file.rotation]
            strategy = "daily"
            max_files = 7
            "#,
        )
        .unwrap();
        assert_eq!(settings.application.name, "registry");
        assert_eq!(settings.server.address(), "0.0.0.0:9000");
        assert!(settings.database.auto_migrate);
        assert_eq!(settings.pagination.max_per_page, 0);
        assert!(!settings.logger.console.enabled);
        assert_eq!(settings.logger.file.format, LogFormat::Json);
        assert_eq!(
            settings.logger.file.rotation.strategy,
            RotationStrategy::Time(TimeUnit::Daily)
        );
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let db = DatabaseConfig {
            url: "postgres://registry:secret@db:5432/registry".to_string(),
            ..Default::default()
        };
        assert_eq!(db.redacted_url(), "postgres://registry:***@db:5432/registry");

        let no_credentials = DatabaseConfig {
            url: "postgres://db/registry".to_string(),
            ..Default::default()
        };
        assert_eq!(no_credentials.redacted_url(), "postgres://db/registry");
    }

    #[test]
    fn test_pagination_resolver_uses_configured_sizes() {
        let config = PaginationConfig {
            default_per_page: 7,
            max_per_page: 20,
        };
        let resolver = config.resolver();
        assert_eq!(resolver.resolve(1, 0, 100).unwrap().per_page, 7);
        assert_eq!(resolver.resolve(1, 500, 100).unwrap().per_page, 20);
    }

    proptest! {
        #[test]
        fn prop_settings_toml_roundtrip(
            port in 1u16..,
            per_page in 1i64..1000,
            level in prop::sample::select(vec!["trace", "debug", "info", "warn", "error"]),
        ) {
            let mut settings = Settings::default();
            settings.server.port = port;
            settings.pagination.default_per_page = per_page;
            settings.logger.level = level.to_string();

            let text = toml::to_string(&settings).unwrap();
            let back: Settings = toml::from_str(&text).unwrap();
            prop_assert_eq!(back, settings);
        }
    }
}
