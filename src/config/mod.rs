//! Configuration management
//!
//! Settings are loaded in layers by [`ConfigLoader`]:
//! 1. `default.toml`
//! 2. `{environment}.toml`, chosen by `REGISTRY_APP_ENV`
//! 3. `local.toml`, for uncommitted overrides
//! 4. `REGISTRY_*` environment variables, `__` separating nested keys
//!
//! Command line flags are merged last by the CLI layer.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DatabaseConfig, PaginationConfig, ServerConfig, Settings,
};
