use std::fmt;

use thiserror::Error;

/// Where a configuration value came from, for error reporting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SettingSource {
    CliFlag(&'static str),
    Environment(&'static str),
    ConfigKey(&'static str),
    Default,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingSource::CliFlag(flag) => write!(f, "CLI flag {flag}"),
            SettingSource::Environment(var) => write!(f, "environment variable {var}"),
            SettingSource::ConfigKey(key) => write!(f, "configuration key {key}"),
            SettingSource::Default => write!(f, "built-in default"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid value for {key} from {origin}: {reason} (value: {value})")]
pub(crate) struct ConfigError {
    pub(crate) key: &'static str,
    pub(crate) value: String,
    pub(crate) origin: SettingSource,
    pub(crate) reason: String,
}

impl ConfigError {
    pub(crate) fn invalid<V, R>(key: &'static str, value: V, origin: SettingSource, reason: R) -> Self
    where
        V: Into<String>,
        R: Into<String>,
    {
        Self {
            key,
            value: value.into(),
            origin,
            reason: reason.into(),
        }
    }
}
