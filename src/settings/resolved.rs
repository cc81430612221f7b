use std::path::PathBuf;

use wearcomb::GroupRanges;

use super::errors::{ConfigError, SettingSource};

/// Where the sample list comes from.
#[derive(Clone, Debug)]
pub(crate) enum SampleSource {
	/// Sample text supplied directly on the command line.
	Inline(String),
	/// Sample text read from a file.
	File(PathBuf),
	/// Sample text read from standard input.
	Stdin,
}

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug)]
pub(crate) struct ResolvedConfig {
	pub(crate) min_wear: f64,
	pub(crate) max_wear: f64,
	pub(crate) desired: Option<f64>,
	pub(crate) specificity: f64,
	pub(crate) subset_size: usize,
	pub(crate) groups: GroupRanges,
	pub(crate) input: SampleSource,
}

/// Origin bookkeeping for the values validation can reject.
#[derive(Debug, Default)]
pub(crate) struct ConfigSources {
	pub(crate) min_wear: Option<SettingSource>,
	pub(crate) max_wear: Option<SettingSource>,
	pub(crate) specificity: Option<SettingSource>,
	pub(crate) subset_size: Option<SettingSource>,
}

impl ConfigSources {
	fn source_for(slot: Option<SettingSource>) -> SettingSource {
		slot.unwrap_or(SettingSource::Default)
	}
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		if self.subset_size == 0 {
			return Err(ConfigError::invalid(
				"search.subset_size",
				self.subset_size.to_string(),
				ConfigSources::source_for(sources.subset_size),
				"must be at least 1",
			));
		}

		if self.specificity < 0.0 {
			return Err(ConfigError::invalid(
				"search.specificity",
				self.specificity.to_string(),
				ConfigSources::source_for(sources.specificity),
				"must not be negative",
			));
		}

		if self.min_wear >= self.max_wear {
			let origin = if sources.min_wear.is_some() {
				ConfigSources::source_for(sources.min_wear)
			} else {
				ConfigSources::source_for(sources.max_wear)
			};
			return Err(ConfigError::invalid(
				"search.min_wear",
				self.min_wear.to_string(),
				origin,
				format!("must be below search.max_wear ({})", self.max_wear),
			));
		}

		Ok(())
	}

	/// Print a human readable summary of the effective configuration.
	pub(crate) fn print_summary(&self) {
		println!("target range: [{}, {})", self.min_wear, self.max_wear);
		match self.desired {
			Some(desired) => println!("desired wear: {desired}"),
			None => println!("desired wear: (unset)"),
		}
		println!("specificity: {}", self.specificity);
		println!("subset size: {}", self.subset_size);
		match &self.input {
			SampleSource::Inline(_) => println!("samples: inline argument"),
			SampleSource::File(path) => println!("samples: {}", path.display()),
			SampleSource::Stdin => println!("samples: stdin"),
		}
	}
}
