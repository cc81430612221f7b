use anyhow::{Result, anyhow};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::build_config;
use crate::cli::CliArgs;

/// Load configuration by combining CLI arguments, config files and
/// environment variables.
pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let builder = build_config(cli)?;
	let mut raw: RawConfig = builder
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve(cli)
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;

	use crate::cli::CliArgs;
	use crate::settings::SampleSource;

	use super::*;

	fn cli(args: &[&str]) -> CliArgs {
		let mut full = vec!["wearcomb"];
		full.extend_from_slice(args);
		CliArgs::try_parse_from(full).expect("test arguments parse")
	}

	#[test]
	fn load_applies_built_in_defaults() {
		let resolved = load(&cli(&["--no-config"])).expect("load");
		assert_eq!(resolved.min_wear, 0.0);
		assert_eq!(resolved.max_wear, 0.8);
		assert_eq!(resolved.specificity, 0.000_000_01);
		assert_eq!(resolved.subset_size, 5);
		assert!(resolved.desired.is_none());
		assert!(matches!(resolved.input, SampleSource::Stdin));
	}

	#[test]
	fn load_reads_values_from_a_config_file() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("wearcomb.toml");
		fs::write(
			&path,
			"[search]\nsubset_size = 10\nspecificity = 0.001\n\n[[group]]\ntag = 2\nmin_wear = 0.06\nmax_wear = 0.8\n",
		)
		.expect("write config");

		let path_text = path.display().to_string();
		let resolved = load(&cli(&["--no-config", "--config", &path_text])).expect("load");
		assert_eq!(resolved.subset_size, 10);
		assert_eq!(resolved.specificity, 0.001);
		let override_range = resolved.groups.range_for(2);
		assert_eq!(f64::from(override_range.min), f64::from(0.06f32));
	}

	#[test]
	fn cli_overrides_beat_config_files() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("wearcomb.toml");
		fs::write(&path, "[search]\nsubset_size = 10\n").expect("write config");

		let path_text = path.display().to_string();
		let resolved =
			load(&cli(&["--no-config", "--config", &path_text, "-k", "3"])).expect("load");
		assert_eq!(resolved.subset_size, 3);
	}

	#[test]
	fn invalid_configuration_is_rejected() {
		let error = load(&cli(&["--no-config", "-k", "0"])).expect_err("zero subset size");
		assert!(error.to_string().contains("search.subset_size"));
	}
}
