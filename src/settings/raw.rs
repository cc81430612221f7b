use std::env;

use anyhow::{Error, Result};
use serde::Deserialize;

use wearcomb::{GroupRanges, WearRange};

use crate::cli::CliArgs;

use super::errors::{ConfigError, SettingSource};
use super::resolved::{ConfigSources, ResolvedConfig, SampleSource};

const DEFAULT_MIN_WEAR: f64 = 0.0;
const DEFAULT_MAX_WEAR: f64 = 0.8;
const DEFAULT_SPECIFICITY: f64 = 0.000_000_01;
const DEFAULT_SUBSET_SIZE: usize = 5;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    search: SearchSection,
    group: Vec<GroupSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
    min_wear: Option<f64>,
    max_wear: Option<f64>,
    desired: Option<f64>,
    specificity: Option<f64>,
    subset_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupSection {
    tag: u32,
    min_wear: f64,
    max_wear: f64,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if cli.min_wear.is_some() {
            self.search.min_wear = cli.min_wear;
        }
        if cli.max_wear.is_some() {
            self.search.max_wear = cli.max_wear;
        }
        if cli.desired.is_some() {
            self.search.desired = cli.desired;
        }
        if cli.specificity.is_some() {
            self.search.specificity = cli.specificity;
        }
        if cli.subset_size.is_some() {
            self.search.subset_size = cli.subset_size;
        }
    }

    /// Convert the raw configuration into a [`ResolvedConfig`], validating and
    /// filling defaults where required.
    pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
        let sources = ConfigSources {
            min_wear: detect_source(
                cli.min_wear.is_some(),
                self.search.min_wear.is_some(),
                "WEARCOMB__SEARCH__MIN_WEAR",
                "--min-wear",
                "search.min_wear",
            ),
            max_wear: detect_source(
                cli.max_wear.is_some(),
                self.search.max_wear.is_some(),
                "WEARCOMB__SEARCH__MAX_WEAR",
                "--max-wear",
                "search.max_wear",
            ),
            specificity: detect_source(
                cli.specificity.is_some(),
                self.search.specificity.is_some(),
                "WEARCOMB__SEARCH__SPECIFICITY",
                "--specificity",
                "search.specificity",
            ),
            subset_size: detect_source(
                cli.subset_size.is_some(),
                self.search.subset_size.is_some(),
                "WEARCOMB__SEARCH__SUBSET_SIZE",
                "--subset-size",
                "search.subset_size",
            ),
        };

        let mut groups = GroupRanges::default();
        for section in &self.group {
            if section.max_wear <= section.min_wear {
                return Err(Error::new(ConfigError::invalid(
                    "group",
                    format!(
                        "tag {} range {}:{}",
                        section.tag, section.min_wear, section.max_wear
                    ),
                    SettingSource::ConfigKey("group"),
                    "minimum wear must be below maximum wear",
                )));
            }
            groups.insert(
                section.tag,
                WearRange::new(section.min_wear, section.max_wear),
            );
        }
        for range in &cli.group_range {
            if range.max <= range.min {
                return Err(Error::new(ConfigError::invalid(
                    "group",
                    format!("tag {} range {}:{}", range.tag, range.min, range.max),
                    SettingSource::CliFlag("--group-range"),
                    "minimum wear must be below maximum wear",
                )));
            }
            groups.insert(range.tag, WearRange::new(range.min, range.max));
        }

        let input = if let Some(samples) = &cli.samples {
            SampleSource::Inline(samples.clone())
        } else if let Some(path) = &cli.input {
            SampleSource::File(path.clone())
        } else {
            SampleSource::Stdin
        };

        let config = ResolvedConfig {
            min_wear: self.search.min_wear.unwrap_or(DEFAULT_MIN_WEAR),
            max_wear: self.search.max_wear.unwrap_or(DEFAULT_MAX_WEAR),
            desired: self.search.desired,
            specificity: self.search.specificity.unwrap_or(DEFAULT_SPECIFICITY),
            subset_size: self.search.subset_size.unwrap_or(DEFAULT_SUBSET_SIZE),
            groups,
            input,
        };

        config.validate(&sources).map_err(Error::new)?;

        Ok(config)
    }
}

fn detect_source(
    cli_present: bool,
    value_present: bool,
    env_var: &'static str,
    cli_flag: &'static str,
    key: &'static str,
) -> Option<SettingSource> {
    if !value_present {
        return None;
    }

    if cli_present {
        return Some(SettingSource::CliFlag(cli_flag));
    }

    if env::var_os(env_var).is_some() {
        return Some(SettingSource::Environment(env_var));
    }

    Some(SettingSource::ConfigKey(key))
}
