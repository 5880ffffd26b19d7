//! Worker logging configuration.
//!
//! Hosts running grouping/join stages in workers often want most logs at `INFO` and a few noisy or
//! interesting modules at a different level. A [`LogLevelOverride`] names a module (or type) and a
//! level and is written `name#LEVEL`, e.g. `keyjoin_dataset::grouping#TRACE`. The string form is
//! also the serde representation.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoggingOptionsError {
    #[error("Unsupported log level: {0}")]
    UnsupportedLevel(String),

    #[error("log level override must look like name#LEVEL, got {0:?}")]
    MalformedOverride(String),
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warn => LevelFilter::Warn,
            Level::Error => LevelFilter::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggingOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            other => Err(LoggingOptionsError::UnsupportedLevel(other.to_string())),
        }
    }
}

/// Sets the level for one module path or type name (and everything nested under it).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevelOverride {
    name: String,
    level: Level,
}

impl LogLevelOverride {
    pub fn for_name(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    /// Override for a module, typically `module_path!()`.
    pub fn for_module(module_path: &str, level: Level) -> Self {
        Self::for_name(module_path, level)
    }

    /// Override for the module path of `T`, e.g. `keyjoin_dataset::options::GroupingOptions`.
    ///
    /// Generic arguments are dropped, so `Dataset<u8>` and `Dataset<String>` share one name.
    pub fn for_type<T: ?Sized>(level: Level) -> Self {
        let full = std::any::type_name::<T>();
        let name = full.split('<').next().unwrap_or(full);
        Self::for_name(name, level)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether this override applies to `target`: the same path or a `::`-nested child of it.
    pub fn matches(&self, target: &str) -> bool {
        match target.strip_prefix(self.name.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl fmt::Display for LogLevelOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.level)
    }
}

impl FromStr for LogLevelOverride {
    type Err = LoggingOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, level) = s
            .rsplit_once('#')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| LoggingOptionsError::MalformedOverride(s.to_string()))?;
        Ok(Self::for_name(name, level.parse()?))
    }
}

impl TryFrom<String> for LogLevelOverride {
    type Error = LoggingOptionsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogLevelOverride> for String {
    fn from(value: LogLevelOverride) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerLoggingOptions {
    pub default_level: Level,
    pub overrides: Vec<LogLevelOverride>,
}

impl WorkerLoggingOptions {
    pub fn with_override(mut self, level_override: LogLevelOverride) -> Self {
        self.overrides.push(level_override);
        self
    }

    /// Level for `target`, taken from the most specific matching override.
    ///
    /// When two overrides have the same name the later one wins.
    pub fn level_for(&self, target: &str) -> Level {
        self.overrides
            .iter()
            .enumerate()
            .filter(|(_, o)| o.matches(target))
            .max_by_key(|(idx, o)| (o.name.len(), *idx))
            .map(|(_, o)| o.level)
            .unwrap_or(self.default_level)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.overrides
            .iter()
            .map(|o| o.level)
            .chain(std::iter::once(self.default_level))
            .min()
            .unwrap_or(self.default_level)
            .to_level_filter()
    }
}

/// Applies [`WorkerLoggingOptions`] in front of another logger.
#[derive(Debug)]
pub struct OverrideLogger<L> {
    options: WorkerLoggingOptions,
    inner: L,
}

impl<L: Log> OverrideLogger<L> {
    pub fn new(options: WorkerLoggingOptions, inner: L) -> Self {
        Self { options, inner }
    }

    pub fn options(&self) -> &WorkerLoggingOptions {
        &self.options
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Installs this logger process-wide and raises the global max level to match the options.
    pub fn install(self) -> Result<(), SetLoggerError>
    where
        L: 'static,
    {
        let max_level = self.options.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl<L: Log> Log for OverrideLogger<L> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.options.level_for(metadata.target()).to_level_filter()
            && self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}
