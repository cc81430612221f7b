//! Non-blocking combination search streamer built on top of the base
//! streaming primitives.
//!
//! A run enumerates every k-sized subset of its sample list in lexicographic
//! index order, evaluates each subset's average wear with single-precision
//! rounding at every step, and streams matching combinations back in batches
//! while staying cancellable through a shared run-id token.

mod channel;
mod combos;
mod params;
mod runner;
mod wear;

pub use channel::{
	MatchResult, ProgressSnapshot, Sample, SearchEnvelope, SearchMarker, SearchOutcome,
	SearchStream, SearchUpdate, SearchView,
};
pub use combos::{CombinationCursor, binomial};
pub use params::{ParameterError, SearchParameters};
pub use runner::{
	BATCH_CAPACITY, CHECK_INTERVAL, LARGE_SUBSET_CHECK_INTERVAL, PROGRESS_INTERVAL,
	check_interval_for, should_abort, stream_combinations,
};
pub use wear::{
	MatchKind, WearRange, classify, count_decimals, evaluate, normalize, round_f32,
	truncate_decimals,
};
