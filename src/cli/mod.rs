//! Command line interface
//!
//! - `parser`: clap definitions
//! - `validation`: value parsers for arguments
//! - `config_merger`: applies flags on top of loaded settings
//! - `handlers`: serve and migrate
//! - `executor`: dispatch

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::{ConfigError, Settings};

/// Loads settings for `cli` and applies its overrides.
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    ConfigurationMerger::load(cli)?.merge_cli_args(cli)
}
