//! Sample-list parsing.
//!
//! Input arrives as comma-separated entries of the form `value` or
//! `value|group`, the format produced by pasting wear readouts out of
//! inventory tooling. Parsing is the upstream boundary of the engine: only
//! finite, fractional values survive it, so the search itself never has to
//! re-check its inputs.

use std::collections::HashMap;

use wearcomb_stream::search::{Sample, WearRange};

/// Source wear ranges keyed by group tag.
#[derive(Clone, Debug)]
pub struct GroupRanges {
	default: WearRange,
	overrides: HashMap<u32, WearRange>,
}

impl GroupRanges {
	/// Create a table that answers `default` for every group.
	#[must_use]
	pub fn new(default: WearRange) -> Self {
		Self {
			default,
			overrides: HashMap::new(),
		}
	}

	/// Override the source range for a specific group.
	pub fn insert(&mut self, tag: u32, range: WearRange) {
		self.overrides.insert(tag, range);
	}

	/// Source range for the given group.
	#[must_use]
	pub fn range_for(&self, tag: u32) -> WearRange {
		self.overrides.get(&tag).copied().unwrap_or(self.default)
	}
}

impl Default for GroupRanges {
	fn default() -> Self {
		Self::new(WearRange::new(0.0, 0.8))
	}
}

/// Samples accepted from an input string, plus a count of rejected entries.
#[derive(Clone, Debug)]
pub struct ParsedSamples {
	/// Usable samples in input order.
	pub samples: Vec<Sample>,
	/// Entries dropped for being unparsable, non-finite, or integral.
	pub skipped: usize,
}

/// Parse comma-separated `value|group` entries into tagged samples.
///
/// Entries without a `|group` suffix default to group 1. Entries that fail
/// to parse, are non-finite, or carry no fractional part are skipped and
/// counted; wear data is fractional by nature and whole numbers are stray
/// identifiers pasted along with it. Input order is preserved; it defines
/// the enumeration order of the search.
#[must_use]
pub fn parse_samples(input: &str, ranges: &GroupRanges) -> ParsedSamples {
	let mut samples = Vec::new();
	let mut skipped = 0usize;
	for entry in input.split(',') {
		let entry = entry.trim();
		if entry.is_empty() {
			continue;
		}
		let (value_text, tag_text) = match entry.split_once('|') {
			Some((value, tag)) => (value.trim(), Some(tag.trim())),
			None => (entry, None),
		};
		let Ok(raw) = value_text.parse::<f64>() else {
			skipped += 1;
			continue;
		};
		let tag = match tag_text {
			Some(text) => match text.parse::<u32>() {
				Ok(tag) => tag,
				Err(_) => {
					skipped += 1;
					continue;
				}
			},
			None => 1,
		};
		if !raw.is_finite() || raw.fract() == 0.0 {
			skipped += 1;
			continue;
		}
		samples.push(Sample {
			raw,
			range: ranges.range_for(tag),
			tag,
		});
	}
	ParsedSamples { samples, skipped }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_tagged_entries_in_order() {
		let ranges = GroupRanges::default();
		let parsed = parse_samples("0.12|1, 0.34|2 ,0.56", &ranges);
		assert_eq!(parsed.skipped, 0);
		let raws: Vec<f64> = parsed.samples.iter().map(|sample| sample.raw).collect();
		assert_eq!(raws, vec![0.12, 0.34, 0.56]);
		let tags: Vec<u32> = parsed.samples.iter().map(|sample| sample.tag).collect();
		assert_eq!(tags, vec![1, 2, 1]);
	}

	#[test]
	fn skips_integral_and_malformed_entries() {
		let ranges = GroupRanges::default();
		let parsed = parse_samples("0.5, 3, abc, 0.25|x, , 0.75", &ranges);
		assert_eq!(parsed.skipped, 3);
		let raws: Vec<f64> = parsed.samples.iter().map(|sample| sample.raw).collect();
		assert_eq!(raws, vec![0.5, 0.75]);
	}

	#[test]
	fn applies_group_range_overrides() {
		let mut ranges = GroupRanges::default();
		ranges.insert(2, WearRange::new(0.1, 0.6));
		let parsed = parse_samples("0.2|1,0.3|2", &ranges);
		assert_eq!(parsed.samples[0].range, WearRange::new(0.0, 0.8));
		assert_eq!(parsed.samples[1].range, WearRange::new(0.1, 0.6));
	}

	#[test]
	fn empty_input_yields_no_samples() {
		let parsed = parse_samples("  ", &GroupRanges::default());
		assert!(parsed.samples.is_empty());
		assert_eq!(parsed.skipped, 0);
	}
}
