//! Configuration validation logic
//!
//! Checks run after loading and again after command line overrides are
//! merged, so a bad value is reported before any connection is opened.

use crate::config::error::ConfigError;
use crate::config::settings::{DatabaseConfig, PaginationConfig, ServerConfig, Settings};
use crate::logger::LoggerError;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request and keep-alive timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required, e.g. 127.0.0.1 or 0.0.0.0.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a non-empty `postgres://` or `postgresql://` URL
    /// - Connection counts must be positive with min not above max
    /// - Connection timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Set database.url or REGISTRY_DATABASE__URL.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl PaginationConfig {
    /// Validate pagination configuration
    ///
    /// # Validation Rules
    /// - Default page size must be positive
    /// - Max page size is `0` (uncapped) or at least the default
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_per_page <= 0 {
            return Err(ConfigError::ValidationError {
                field: "pagination.default_per_page".to_string(),
                message: format!(
                    "Default page size must be greater than 0, got {}.",
                    self.default_per_page
                ),
            });
        }

        if self.max_per_page < 0 {
            return Err(ConfigError::validation(
                "pagination.max_per_page",
                "Max page size must be 0 (no cap) or a positive number.",
            ));
        }

        if self.max_per_page > 0 && self.max_per_page < self.default_per_page {
            return Err(ConfigError::ValidationError {
                field: "pagination.max_per_page".to_string(),
                message: format!(
                    "Max page size ({}) cannot be smaller than the default page size ({}).",
                    self.max_per_page, self.default_per_page
                ),
            });
        }

        Ok(())
    }
}

impl From<LoggerError> for ConfigError {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::Config { field, message } => ConfigError::ValidationError {
                field: format!("logger.{}", field.trim_start_matches("logger.")),
                message,
            },
            other => ConfigError::validation("logger".to_string(), other.to_string()),
        }
    }
}

impl Settings {
    /// Validate all sections, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application.name.trim().is_empty() {
            return Err(ConfigError::validation(
                "application.name",
                "Application name is required.",
            ));
        }

        self.server.validate()?;
        self.database.validate()?;
        self.pagination.validate()?;
        self.logger.validate()?;

        Ok(())
    }
}
