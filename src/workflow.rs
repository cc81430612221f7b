use std::fs;
use std::io::Read;

use anyhow::{Context, Result, bail};

use wearcomb::{
	MatchResult, ParsedSamples, ProgressSnapshot, Sample, SearchOutcome, SearchParameters,
	SearchRuntime, SearchView, WearRange, binomial, evaluate, normalize, parse_samples,
};

use crate::cli::{OutputFormat, format_match};
use crate::settings::{ResolvedConfig, SampleSource};

/// Which of the tool's operations to run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunMode {
	/// Enumerate subsets and stream the matching combinations.
	Search,
	/// Only report how many combinations the input would produce.
	CountOnly,
	/// Evaluate the input as a single combination.
	Eval,
}

/// Final report handed to the output layer.
pub(crate) enum RunReport {
	Count {
		samples: usize,
		skipped: usize,
		subset_size: usize,
		total: u64,
	},
	Eval {
		wear: f32,
		samples: Vec<Sample>,
	},
	Search {
		outcome: SearchOutcome,
		progress: ProgressSnapshot,
		matches: Vec<MatchResult>,
		skipped: usize,
		/// Whether matches were already echoed while streaming.
		streamed: bool,
	},
}

/// Coordinates reading the sample list and driving the search runtime.
pub(crate) struct SearchWorkflow {
	settings: ResolvedConfig,
	mode: RunMode,
	format: OutputFormat,
}

impl SearchWorkflow {
	pub(crate) fn new(settings: ResolvedConfig, mode: RunMode, format: OutputFormat) -> Self {
		Self {
			settings,
			mode,
			format,
		}
	}

	pub(crate) fn run(self) -> Result<RunReport> {
		let text = self.read_input()?;
		let parsed = parse_samples(&text, &self.settings.groups);

		match self.mode {
			RunMode::CountOnly => Ok(RunReport::Count {
				samples: parsed.samples.len(),
				skipped: parsed.skipped,
				subset_size: self.settings.subset_size,
				total: binomial(parsed.samples.len(), self.settings.subset_size),
			}),
			RunMode::Eval => self.run_eval(parsed),
			RunMode::Search => self.run_search(parsed),
		}
	}

	fn read_input(&self) -> Result<String> {
		match &self.settings.input {
			SampleSource::Inline(text) => Ok(text.clone()),
			SampleSource::File(path) => fs::read_to_string(path)
				.with_context(|| format!("failed to read samples from {}", path.display())),
			SampleSource::Stdin => {
				let mut text = String::new();
				std::io::stdin()
					.read_to_string(&mut text)
					.context("failed to read samples from stdin")?;
				Ok(text)
			}
		}
	}

	fn run_eval(&self, parsed: ParsedSamples) -> Result<RunReport> {
		let subset_size = self.settings.subset_size;
		if parsed.samples.len() != subset_size {
			bail!(
				"--eval needs exactly {subset_size} samples, got {}",
				parsed.samples.len()
			);
		}
		let target = WearRange::new(self.settings.min_wear, self.settings.max_wear);
		let normalized: Vec<f32> = parsed
			.samples
			.iter()
			.map(|sample| normalize(sample.raw, sample.range))
			.collect();
		Ok(RunReport::Eval {
			wear: evaluate(&normalized, target),
			samples: parsed.samples,
		})
	}

	fn run_search(&self, parsed: ParsedSamples) -> Result<RunReport> {
		let desired = self
			.settings
			.desired
			.context("a desired wear value is required; pass --desired")?;
		let params = SearchParameters {
			target_range: WearRange::new(self.settings.min_wear, self.settings.max_wear),
			desired,
			specificity: self.settings.specificity,
			subset_size: self.settings.subset_size,
		};

		let mut runtime = SearchRuntime::spawn();
		let handle = runtime.start_search(parsed.samples, params)?;

		let mut view = StreamingView::new(self.format == OutputFormat::Plain);
		loop {
			let envelope = runtime
				.results()
				.recv()
				.context("search worker disappeared")?;
			if envelope.id != handle.id() {
				continue;
			}
			let complete = envelope.complete;
			envelope.dispatch(&mut view);
			if complete {
				break;
			}
		}
		runtime.shutdown();

		let (outcome, progress) = view
			.terminal
			.context("run ended without a terminal update")?;
		Ok(RunReport::Search {
			outcome,
			progress,
			matches: view.matches,
			skipped: parsed.skipped,
			streamed: view.echo,
		})
	}
}

/// Collects streamed updates, optionally echoing them live.
struct StreamingView {
	echo: bool,
	progress_rendered: bool,
	matches: Vec<MatchResult>,
	terminal: Option<(SearchOutcome, ProgressSnapshot)>,
}

impl StreamingView {
	fn new(echo: bool) -> Self {
		Self {
			echo,
			progress_rendered: false,
			matches: Vec::new(),
			terminal: None,
		}
	}
}

impl SearchView for StreamingView {
	fn append_matches(&mut self, mut matches: Vec<MatchResult>) {
		if self.echo {
			for result in &matches {
				println!("{}", format_match(result));
			}
		}
		self.matches.append(&mut matches);
	}

	#[allow(clippy::cast_precision_loss)]
	fn update_progress(&mut self, progress: ProgressSnapshot) {
		if self.echo && progress.total > 0 {
			let percent = progress.processed as f64 / progress.total as f64 * 100.0;
			eprint!(
				"\r{} / {} ({percent:.2}%)",
				progress.processed, progress.total
			);
			self.progress_rendered = true;
		}
	}

	fn record_completion(&mut self, outcome: SearchOutcome, progress: ProgressSnapshot) {
		if self.progress_rendered {
			eprintln!();
		}
		self.terminal = Some((outcome, progress));
	}
}
