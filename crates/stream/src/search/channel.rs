use std::sync::mpsc::Sender;

use serde::Serialize;

use super::wear::WearRange;
use crate::{DataStream, StreamEnvelope};

/// Raw input sample tagged with its source range and display group.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Sample {
	/// Wear value exactly as supplied, at full double precision.
	pub raw: f64,
	/// Source interval the sample is normalized against.
	pub range: WearRange,
	/// Opaque group tag carried through to results for display.
	pub tag: u32,
}

/// One matching combination.
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
	/// Evaluated wear of the combination.
	pub wear: f32,
	/// The combined samples, in enumeration order.
	pub samples: Vec<Sample>,
	/// Whether the match satisfied the exact rule rather than only the
	/// tolerance window.
	pub exact: bool,
}

/// Point-in-time counters for a running search.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ProgressSnapshot {
	/// Subsets evaluated so far.
	pub processed: u64,
	/// Exact number of subsets the run will enumerate.
	pub total: u64,
	/// Matches recorded so far.
	pub found: u64,
}

/// Terminal state of a search run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutcome {
	/// Every subset was enumerated.
	Completed,
	/// The run was cancelled or superseded before finishing.
	Cancelled,
}

/// Payload streamed from a search run to its consumer.
#[derive(Clone, Debug)]
pub enum SearchUpdate {
	/// A flushed batch of matches, in enumeration order.
	Batch(Vec<MatchResult>),
	/// A progress heartbeat.
	Progress(ProgressSnapshot),
	/// The terminal update; always preceded by the final batch flush.
	Finished {
		/// How the run ended.
		outcome: SearchOutcome,
		/// Final counters for the run.
		progress: ProgressSnapshot,
	},
}

/// Unit marker identifying search traffic on the shared stream type.
#[derive(Clone, Copy, Debug)]
pub struct SearchMarker;

/// Envelope type delivered to search consumers.
pub type SearchEnvelope = StreamEnvelope<SearchMarker, SearchUpdate>;

/// Consumer responsible for applying streamed search updates.
pub trait SearchView {
	/// Append a flushed batch of matches.
	fn append_matches(&mut self, matches: Vec<MatchResult>);

	/// Observe a progress heartbeat.
	fn update_progress(&mut self, progress: ProgressSnapshot);

	/// Observe the terminal update for a run.
	///
	/// Called exactly once per run identifier, after the final batch flush.
	/// Consumers should use this to retire progress indicators and decide
	/// between "completed" and "cancelled" presentations.
	fn record_completion(&mut self, outcome: SearchOutcome, progress: ProgressSnapshot);
}

impl StreamEnvelope<SearchMarker, SearchUpdate> {
	/// Apply the update embedded in the envelope to the provided view.
	pub fn dispatch(self, view: &mut dyn SearchView) {
		match self.payload {
			SearchUpdate::Batch(matches) => view.append_matches(matches),
			SearchUpdate::Progress(progress) => view.update_progress(progress),
			SearchUpdate::Finished { outcome, progress } => {
				view.record_completion(outcome, progress);
			}
		}
	}
}

/// Handle used by a run to stream updates back to its consumer.
pub struct SearchStream<'a> {
	inner: DataStream<'a, SearchMarker, SearchUpdate>,
}

impl<'a> SearchStream<'a> {
	/// Create a new stream handle for the run identified by `id`.
	#[must_use]
	pub fn new(tx: &'a Sender<SearchEnvelope>, id: u64) -> Self {
		Self {
			inner: DataStream::new(tx, id, SearchMarker),
		}
	}

	/// Identifier of the run this stream belongs to.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.inner.id()
	}

	/// Send a flushed batch of matches.
	///
	/// Returns `false` when the receiver hung up.
	pub fn send_batch(&self, matches: Vec<MatchResult>) -> bool {
		self.inner.send(SearchUpdate::Batch(matches), false)
	}

	/// Send a progress heartbeat.
	pub fn send_progress(&self, progress: ProgressSnapshot) -> bool {
		self.inner.send(SearchUpdate::Progress(progress), false)
	}

	/// Send the terminal update for the run.
	///
	/// The `complete` flag on the emitted envelope is `true` exactly here,
	/// and nowhere else.
	pub fn finish(&self, outcome: SearchOutcome, progress: ProgressSnapshot) -> bool {
		self.inner.send(SearchUpdate::Finished { outcome, progress }, true)
	}
}

impl Clone for SearchStream<'_> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}
