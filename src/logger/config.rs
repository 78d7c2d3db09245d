//! Logger configuration.
//!
//! These types deserialize straight from the `[logger]` section of the
//! settings files.

use std::path::PathBuf;
use std::str::FromStr;

use jiff::{Timestamp, ToSpan, tz::TimeZone};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logger::LoggerError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub level: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;
        self.file.validate()?;
        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "logger",
                "at least one output (console or file) must be enabled",
            ));
        }
        Ok(())
    }

    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        let level = self.level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(LoggerError::config(
                "logger.level",
                format!(
                    "invalid level '{}', expected one of: {}",
                    self.level,
                    LEVELS.join(", ")
                ),
            ));
        }
        Level::from_str(&level).map_err(|e| LoggerError::config("logger.level", e.to_string()))
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// ANSI colors, only honored when stdout is a terminal
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    /// Keep existing content on startup instead of truncating
    pub append: bool,
    pub format: LogFormat,
    pub rotation: RotationConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if !self.enabled {
            return Ok(());
        }
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "logger.file.path",
                "path cannot be empty when file output is enabled",
            ));
        }
        self.rotation.validate()
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/course-registry.log"),
            append: true,
            format: LogFormat::Json,
            rotation: RotationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(
                "logger.file.format",
                format!("invalid format '{}', expected full, compact or json", s),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub strategy: RotationStrategy,
    /// Bytes written before a size rotation
    pub max_size: u64,
    /// Files kept on disk, the active one included
    pub max_files: usize,
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_size == 0 {
            return Err(LoggerError::config(
                "logger.file.rotation.max_size",
                "must be greater than 0",
            ));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config(
                "logger.file.rotation.max_files",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::Size,
            max_size: 10 * 1024 * 1024,
            max_files: 5,
        }
    }
}

/// When the active file is rolled over.
///
/// Serialized as `size`, `hourly`, `daily`, `weekly` or `monthly`; `time` is
/// accepted as an alias for `daily`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RotationStrategy {
    #[default]
    Size,
    Time(TimeUnit),
}

impl FromStr for RotationStrategy {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" => Ok(RotationStrategy::Size),
            "hourly" => Ok(RotationStrategy::Time(TimeUnit::Hourly)),
            "time" | "daily" => Ok(RotationStrategy::Time(TimeUnit::Daily)),
            "weekly" => Ok(RotationStrategy::Time(TimeUnit::Weekly)),
            "monthly" => Ok(RotationStrategy::Time(TimeUnit::Monthly)),
            _ => Err(LoggerError::config(
                "logger.file.rotation.strategy",
                format!(
                    "invalid strategy '{}', expected size, hourly, daily, weekly or monthly",
                    s
                ),
            )),
        }
    }
}

impl TryFrom<String> for RotationStrategy {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RotationStrategy> for String {
    fn from(strategy: RotationStrategy) -> Self {
        match strategy {
            RotationStrategy::Size => "size",
            RotationStrategy::Time(TimeUnit::Hourly) => "hourly",
            RotationStrategy::Time(TimeUnit::Daily) => "daily",
            RotationStrategy::Time(TimeUnit::Weekly) => "weekly",
            RotationStrategy::Time(TimeUnit::Monthly) => "monthly",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl TimeUnit {
    /// The instant one period after `from`, using calendar arithmetic in UTC
    /// so that monthly periods follow real month lengths.
    pub fn next_after(&self, from: Timestamp) -> Option<Timestamp> {
        let zoned = from.to_zoned(TimeZone::UTC);
        let next = match self {
            TimeUnit::Hourly => zoned.checked_add(1.hour()),
            TimeUnit::Daily => zoned.checked_add(1.day()),
            TimeUnit::Weekly => zoned.checked_add(1.week()),
            TimeUnit::Monthly => zoned.checked_add(1.month()),
        };
        next.ok().map(|z| z.timestamp())
    }
}
