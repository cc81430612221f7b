use anyhow::Result;
use serde_json::json;
use wearcomb::{MatchResult, SearchOutcome};

use crate::workflow::RunReport;

/// Render a single match the way the streaming output does.
pub(crate) fn format_match(result: &MatchResult) -> String {
	let samples = result
		.samples
		.iter()
		.map(|sample| format!("{}|{}", sample.raw, sample.tag))
		.collect::<Vec<_>>()
		.join(" + ");
	if result.exact {
		format!("{} (exact) = {samples}", result.wear)
	} else {
		format!("{} = {samples}", result.wear)
	}
}

/// Print a plain-text representation of the run report.
pub(crate) fn print_plain(report: &RunReport) {
	match report {
		RunReport::Count {
			samples,
			skipped,
			subset_size,
			total,
		} => {
			println!("{total} combinations of {subset_size} from {samples} samples");
			if *skipped > 0 {
				println!("Skipped {skipped} unusable input entries");
			}
		}
		RunReport::Eval { wear, samples } => {
			let rendered = samples
				.iter()
				.map(|sample| format!("{}|{}", sample.raw, sample.tag))
				.collect::<Vec<_>>()
				.join(" + ");
			println!("{wear} = {rendered}");
		}
		RunReport::Search {
			outcome,
			progress,
			matches,
			skipped,
			streamed,
		} => {
			if !streamed {
				for result in matches {
					println!("{}", format_match(result));
				}
			}
			match outcome {
				SearchOutcome::Completed if progress.found == 0 => {
					println!(
						"Search completed: no matches in {} combinations",
						progress.total
					);
				}
				SearchOutcome::Completed => {
					println!(
						"Search completed: {} matches in {} combinations",
						progress.found, progress.total
					);
				}
				SearchOutcome::Cancelled => {
					println!(
						"Search cancelled after {} of {} combinations ({} matches)",
						progress.processed, progress.total, progress.found
					);
				}
			}
			if *skipped > 0 {
				println!("Skipped {skipped} unusable input entries");
			}
		}
	}
}

/// Format the run report as a JSON string.
pub(crate) fn format_report_json(report: &RunReport) -> Result<String> {
	let payload = match report {
		RunReport::Count {
			samples,
			skipped,
			subset_size,
			total,
		} => json!({
			"kind": "count",
			"samples": samples,
			"skipped": skipped,
			"subset_size": subset_size,
			"total": total,
		}),
		RunReport::Eval { wear, samples } => json!({
			"kind": "eval",
			"wear": wear,
			"samples": samples,
		}),
		RunReport::Search {
			outcome,
			progress,
			matches,
			skipped,
			..
		} => json!({
			"kind": "search",
			"outcome": outcome,
			"processed": progress.processed,
			"total": progress.total,
			"found": progress.found,
			"skipped": skipped,
			"matches": matches,
		}),
	};

	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the run report.
pub(crate) fn print_json(report: &RunReport) -> Result<()> {
	println!("{}", format_report_json(report)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use serde_json::Value;
	use wearcomb::{ProgressSnapshot, Sample, WearRange};

	use super::*;

	fn sample(raw: f64, tag: u32) -> Sample {
		Sample {
			raw,
			range: WearRange::new(0.0, 1.0),
			tag,
		}
	}

	#[test]
	fn match_lines_carry_samples_and_exactness() {
		let result = MatchResult {
			wear: 0.3f32,
			samples: vec![sample(0.1, 1), sample(0.5, 2)],
			exact: true,
		};
		assert_eq!(format_match(&result), "0.3 (exact) = 0.1|1 + 0.5|2");
	}

	#[test]
	fn json_format_includes_outcome_and_matches() {
		let report = RunReport::Search {
			outcome: SearchOutcome::Completed,
			progress: ProgressSnapshot {
				processed: 10,
				total: 10,
				found: 1,
			},
			matches: vec![MatchResult {
				wear: 0.3f32,
				samples: vec![sample(0.1, 1), sample(0.5, 1)],
				exact: true,
			}],
			skipped: 2,
			streamed: false,
		};

		let rendered = format_report_json(&report).expect("json");
		let value: Value = serde_json::from_str(&rendered).expect("parse");
		assert_eq!(value["kind"], "search");
		assert_eq!(value["outcome"], "completed");
		assert_eq!(value["found"], 1);
		assert_eq!(value["skipped"], 2);
		assert_eq!(value["matches"][0]["exact"], true);
		assert_eq!(value["matches"][0]["samples"][0]["raw"], 0.1);
	}

	#[test]
	fn json_format_reports_counts() {
		let report = RunReport::Count {
			samples: 12,
			skipped: 0,
			subset_size: 5,
			total: 792,
		};
		let rendered = format_report_json(&report).expect("json");
		let value: Value = serde_json::from_str(&rendered).expect("parse");
		assert_eq!(value["kind"], "count");
		assert_eq!(value["total"], 792);
	}
}
