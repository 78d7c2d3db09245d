//! Layered configuration loading
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml` (optional)
//! 3. `local.toml` (optional)
//! 4. `REGISTRY_*` environment variables
//!
//! A single file named by `REGISTRY_CONFIG_FILE` (or `--config`) replaces
//! the three file layers; environment variables still apply on top.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

pub const CONFIG_DIR_ENV: &str = "REGISTRY_CONFIG_DIR";
pub const CONFIG_FILE_ENV: &str = "REGISTRY_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// `REGISTRY_SERVER__PORT` maps to `server.port`
const ENV_PREFIX: &str = "REGISTRY";
const ENV_SEPARATOR: &str = "__";

type Builder = ConfigBuilder<DefaultState>;

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Set for single-file mode
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
    /// Replaces the process environment as the override source when set
    env_vars: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    /// Loader configured from the process environment.
    ///
    /// # Errors
    /// - `MutualExclusivityError` when both `REGISTRY_CONFIG_DIR` and
    ///   `REGISTRY_CONFIG_FILE` are set
    /// - `EnvVarError` when `REGISTRY_APP_ENV` names no known environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::from_env`] with variables read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config_dir = non_empty(CONFIG_DIR_ENV);
        let config_file = non_empty(CONFIG_FILE_ENV);
        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{} and {} cannot both be set. Use {} for layered configuration or {} for a single file.",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV, CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        let environment = match non_empty(AppEnvironment::ENV_VAR) {
            Some(value) => value.trim().parse()?,
            None => AppEnvironment::default(),
        };

        Ok(Self {
            config_dir: config_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file: config_file.map(PathBuf::from),
            environment,
            env_vars: None,
        })
    }

    /// Layered loading from `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: dir.into(),
            config_file: None,
            environment: AppEnvironment::default(),
            env_vars: None,
        }
    }

    /// Single-file loading from `path`.
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::default(),
            env_vars: None,
        }
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Uses `vars` instead of the process environment for `REGISTRY_*` overrides.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Loads and validates settings from all sources.
    ///
    /// # Errors
    /// - `FileNotFound` when the required file is missing
    /// - `Other` when a source fails to parse or deserialize
    /// - `ValidationError` when a value is out of range
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();
        let builder = match &self.config_file {
            Some(file) => add_file(builder, file, true)?,
            None => self.add_layers(builder)?,
        };
        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .source(self.env_vars.clone()),
        );
        Ok(builder.build()?)
    }

    fn add_layers(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let builder = add_file(builder, &self.config_dir.join("default.toml"), true)?;
        let overlay = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = add_file(builder, &overlay, false)?;
        add_file(builder, &self.config_dir.join("local.toml"), false)
    }
}

fn add_file(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::file_not_found(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}
