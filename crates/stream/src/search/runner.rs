use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::channel::{MatchResult, ProgressSnapshot, Sample, SearchOutcome, SearchStream};
use super::combos::{CombinationCursor, binomial};
use super::params::SearchParameters;
use super::wear::{MatchKind, classify, evaluate, normalize};

/// Matches accumulated before a batch is flushed to the consumer.
pub const BATCH_CAPACITY: usize = 1_000;

/// Wall-clock cadence for progress reports and cooperative yields.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Iteration cadence for check points on typical subset sizes.
pub const CHECK_INTERVAL: u64 = 50_000;

/// Iteration cadence for large subsets, where bookkeeping would otherwise
/// dominate the cheap per-step work.
pub const LARGE_SUBSET_CHECK_INTERVAL: u64 = 1_000_000;

/// Check-point cadence for the given subset size.
#[must_use]
pub fn check_interval_for(subset_size: usize) -> u64 {
	if subset_size >= 10 {
		LARGE_SUBSET_CHECK_INTERVAL
	} else {
		CHECK_INTERVAL
	}
}

/// Check if this run has been cancelled or superseded by a newer one.
pub fn should_abort(id: u64, latest_run_id: &AtomicU64) -> bool {
	latest_run_id.load(Ordering::Acquire) != id
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum RunPassResult {
	Completed,
	Cancelled,
	HungUp,
}

/// Fixed-capacity accumulator that forwards matches to the stream.
struct ResultBatcher<'a, 'tx> {
	stream: &'a SearchStream<'tx>,
	buffer: Vec<MatchResult>,
}

impl<'a, 'tx> ResultBatcher<'a, 'tx> {
	fn new(stream: &'a SearchStream<'tx>) -> Self {
		Self {
			stream,
			buffer: Vec::with_capacity(BATCH_CAPACITY),
		}
	}

	/// Append a match, flushing once the batch reaches capacity.
	fn record(&mut self, result: MatchResult) -> bool {
		self.buffer.push(result);
		if self.buffer.len() >= BATCH_CAPACITY {
			self.flush()
		} else {
			true
		}
	}

	/// Emit any buffered matches.
	fn flush(&mut self) -> bool {
		if self.buffer.is_empty() {
			return true;
		}
		let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(BATCH_CAPACITY));
		self.stream.send_batch(batch)
	}
}

/// Enumerate every subset of `samples`, streaming matches and progress.
///
/// Normalized fractions are computed once per sample up front; each subset is
/// then evaluated, classified against the desired value, and recorded when it
/// matches. At a fixed cadence (every [`PROGRESS_INTERVAL`] of wall clock or
/// every [`check_interval_for`] iterations, whichever comes first) the run
/// flushes its batch, reports progress, and yields the thread so cancellation
/// stays responsive.
///
/// Cancellation is cooperative: the supersede token is checked once per
/// subset and the loop exits at the next check, never mid-subset. Every exit
/// path that still has a live receiver performs a final batch flush before
/// the terminal update, so no match is dropped.
///
/// `params` must already have passed [`SearchParameters::validate`].
/// Returns `false` when the receiver hung up.
pub fn stream_combinations(
	samples: &[Sample],
	params: &SearchParameters,
	stream: &SearchStream<'_>,
	latest_run_id: &AtomicU64,
) -> bool {
	let id = stream.id();
	let subset_size = params.subset_size;
	let normalized: Vec<f32> = samples
		.iter()
		.map(|sample| normalize(sample.raw, sample.range))
		.collect();
	let total = binomial(samples.len(), subset_size);
	let check_interval = check_interval_for(subset_size);

	let mut cursor = CombinationCursor::new(samples.len(), subset_size);
	let mut scratch = vec![0.0f32; subset_size];
	let mut batcher = ResultBatcher::new(stream);
	let mut processed = 0u64;
	let mut found = 0u64;
	let started = Instant::now();
	let mut last_report = Instant::now();

	tracing::debug!(
		target: "wearcomb::search",
		id,
		total,
		samples = samples.len(),
		subset_size,
		"run started"
	);

	let outcome = loop {
		if cursor.is_exhausted() {
			break RunPassResult::Completed;
		}
		if should_abort(id, latest_run_id) {
			break RunPassResult::Cancelled;
		}

		for (slot, &index) in cursor.positions().iter().enumerate() {
			scratch[slot] = normalized[index];
		}
		let wear = evaluate(&scratch, params.target_range);
		let kind = classify(wear, params.desired, params.specificity);
		if kind.is_match() {
			found += 1;
			let combined = cursor
				.positions()
				.iter()
				.map(|&index| samples[index])
				.collect();
			let recorded = batcher.record(MatchResult {
				wear,
				samples: combined,
				exact: kind == MatchKind::Exact,
			});
			if !recorded {
				break RunPassResult::HungUp;
			}
		}
		processed += 1;
		cursor.advance();

		if processed % check_interval == 0 || last_report.elapsed() >= PROGRESS_INTERVAL {
			if !batcher.flush() {
				break RunPassResult::HungUp;
			}
			let snapshot = ProgressSnapshot {
				processed,
				total,
				found,
			};
			if !stream.send_progress(snapshot) {
				break RunPassResult::HungUp;
			}
			last_report = Instant::now();
			thread::yield_now();
		}
	};

	let progress = ProgressSnapshot {
		processed,
		total,
		found,
	};
	let elapsed_ms = started.elapsed().as_millis();
	match outcome {
		RunPassResult::Completed => {
			if !batcher.flush() {
				return false;
			}
			tracing::debug!(
				target: "wearcomb::search",
				id,
				processed,
				found,
				elapsed_ms,
				"run completed"
			);
			stream.finish(SearchOutcome::Completed, progress)
		}
		RunPassResult::Cancelled => {
			if !batcher.flush() {
				return false;
			}
			tracing::debug!(
				target: "wearcomb::search",
				id,
				processed,
				found,
				elapsed_ms,
				"run cancelled"
			);
			stream.finish(SearchOutcome::Cancelled, progress)
		}
		RunPassResult::HungUp => false,
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::mpsc;
	use std::time::Duration;

	use super::super::channel::{SearchEnvelope, SearchUpdate};
	use super::super::wear::WearRange;
	use super::*;

	fn unit_samples(raws: &[f64]) -> Vec<Sample> {
		let unit = WearRange::new(0.0, 1.0);
		raws.iter()
			.map(|&raw| Sample {
				raw,
				range: unit,
				tag: 1,
			})
			.collect()
	}

	fn drain(rx: &mpsc::Receiver<SearchEnvelope>) -> Vec<SearchEnvelope> {
		let mut envelopes = Vec::new();
		loop {
			let envelope = rx
				.recv_timeout(Duration::from_secs(5))
				.expect("stream should terminate");
			let complete = envelope.complete;
			envelopes.push(envelope);
			if complete {
				break;
			}
		}
		envelopes
	}

	fn matches_of(envelopes: &[SearchEnvelope]) -> Vec<MatchResult> {
		envelopes
			.iter()
			.filter_map(|envelope| match &envelope.payload {
				SearchUpdate::Batch(matches) => Some(matches.clone()),
				_ => None,
			})
			.flatten()
			.collect()
	}

	fn terminal_of(envelopes: &[SearchEnvelope]) -> (SearchOutcome, ProgressSnapshot) {
		match envelopes.last().map(|envelope| &envelope.payload) {
			Some(SearchUpdate::Finished { outcome, progress }) => (*outcome, *progress),
			other => panic!("expected terminal update, got {other:?}"),
		}
	}

	#[test]
	fn finds_the_exact_pairs_in_enumeration_order() {
		let samples = unit_samples(&[0.10, 0.20, 0.30, 0.40, 0.50]);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.30,
			specificity: 0.0,
			subset_size: 2,
		};
		let (tx, rx) = mpsc::channel();
		let latest = AtomicU64::new(7);
		let stream = SearchStream::new(&tx, 7);

		assert!(stream_combinations(&samples, &params, &stream, &latest));

		let envelopes = drain(&rx);
		let matches = matches_of(&envelopes);
		let (outcome, progress) = terminal_of(&envelopes);

		assert_eq!(outcome, SearchOutcome::Completed);
		assert_eq!(progress.total, 10);
		assert_eq!(progress.processed, 10);
		assert_eq!(progress.found, 2);

		// (0.10, 0.50) enumerates before (0.20, 0.40).
		assert_eq!(matches.len(), 2);
		assert!(matches.iter().all(|result| result.exact));
		assert_eq!(matches[0].wear, 0.3f32);
		assert_eq!(matches[0].samples[0].raw, 0.10);
		assert_eq!(matches[0].samples[1].raw, 0.50);
		assert_eq!(matches[1].samples[0].raw, 0.20);
		assert_eq!(matches[1].samples[1].raw, 0.40);
	}

	#[test]
	fn zero_matches_is_a_normal_completion() {
		let samples = unit_samples(&[0.10, 0.20, 0.30]);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.99,
			specificity: 0.0,
			subset_size: 2,
		};
		let (tx, rx) = mpsc::channel();
		let latest = AtomicU64::new(1);
		let stream = SearchStream::new(&tx, 1);

		assert!(stream_combinations(&samples, &params, &stream, &latest));

		let envelopes = drain(&rx);
		assert!(matches_of(&envelopes).is_empty());
		let (outcome, progress) = terminal_of(&envelopes);
		assert_eq!(outcome, SearchOutcome::Completed);
		assert_eq!(progress.found, 0);
		assert_eq!(progress.processed, 3);
	}

	#[test]
	fn oversized_subset_completes_immediately() {
		let samples = unit_samples(&[0.10, 0.20, 0.30]);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.30,
			specificity: 0.0,
			subset_size: 5,
		};
		let (tx, rx) = mpsc::channel();
		let latest = AtomicU64::new(1);
		let stream = SearchStream::new(&tx, 1);

		assert!(stream_combinations(&samples, &params, &stream, &latest));

		let envelopes = drain(&rx);
		assert!(matches_of(&envelopes).is_empty());
		let (outcome, progress) = terminal_of(&envelopes);
		assert_eq!(outcome, SearchOutcome::Completed);
		assert_eq!(progress.total, 0);
		assert_eq!(progress.processed, 0);
		assert_eq!(progress.found, 0);
	}

	#[test]
	fn full_batches_flush_at_capacity() {
		// Every single-sample subset matches, so 1500 samples produce one
		// capacity flush of 1000 followed by a final flush of 500.
		let raws: Vec<f64> = (0..1_500).map(|i| 0.1 + f64::from(i) * 1e-9).collect();
		let samples = unit_samples(&raws);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.0,
			specificity: 1.0,
			subset_size: 1,
		};
		let (tx, rx) = mpsc::channel();
		let latest = AtomicU64::new(1);
		let stream = SearchStream::new(&tx, 1);

		assert!(stream_combinations(&samples, &params, &stream, &latest));

		let envelopes = drain(&rx);
		let batch_sizes: Vec<usize> = envelopes
			.iter()
			.filter_map(|envelope| match &envelope.payload {
				SearchUpdate::Batch(matches) => Some(matches.len()),
				_ => None,
			})
			.collect();
		assert_eq!(batch_sizes, vec![1_000, 500]);
		let (outcome, progress) = terminal_of(&envelopes);
		assert_eq!(outcome, SearchOutcome::Completed);
		assert_eq!(progress.found, 1_500);
	}

	#[test]
	fn cancellation_flushes_and_reports_a_distinct_status() {
		// C(60, 5) is large enough that the run cannot finish before the
		// cancel lands, and every subset matches so batches flush early.
		let raws: Vec<f64> = (0..60).map(|i| 0.1 + f64::from(i) * 1e-6).collect();
		let samples = unit_samples(&raws);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.0,
			specificity: 1.0,
			subset_size: 5,
		};
		let total = binomial(60, 5);
		let (tx, rx) = mpsc::channel();
		let latest = Arc::new(AtomicU64::new(3));
		let worker_latest = Arc::clone(&latest);

		let worker = std::thread::spawn(move || {
			let stream = SearchStream::new(&tx, 3);
			stream_combinations(&samples, &params, &stream, &worker_latest)
		});

		// Wait for the first flushed batch, then cancel.
		loop {
			let envelope = rx
				.recv_timeout(Duration::from_secs(10))
				.expect("first batch");
			if matches!(envelope.payload, SearchUpdate::Batch(_)) {
				break;
			}
		}
		latest.store(0, Ordering::Release);

		let envelopes = drain(&rx);
		assert!(worker.join().expect("worker"));
		let (outcome, progress) = terminal_of(&envelopes);
		assert_eq!(outcome, SearchOutcome::Cancelled);
		assert!(progress.processed < total);
	}

	#[test]
	fn hung_up_receiver_stops_the_run() {
		let samples = unit_samples(&[0.10, 0.20, 0.30]);
		let params = SearchParameters {
			target_range: WearRange::new(0.0, 1.0),
			desired: 0.0,
			specificity: 1.0,
			subset_size: 1,
		};
		let (tx, rx) = mpsc::channel();
		drop(rx);
		let latest = AtomicU64::new(1);
		let stream = SearchStream::new(&tx, 1);

		assert!(!stream_combinations(&samples, &params, &stream, &latest));
	}
}
