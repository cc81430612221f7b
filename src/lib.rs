//! Core exports for building and driving `wearcomb` searches.
//!
//! The root module primarily re-exports types from the engine and sample
//! subsystems so that embedders can drive searches without digging through
//! the module hierarchy.

pub mod app_dirs;
pub mod engine;
pub mod logging;
pub mod samples;

pub use engine::{SearchHandle, SearchRuntime};
pub use samples::{GroupRanges, ParsedSamples, parse_samples};

pub use wearcomb_stream::search::{
	MatchResult, ParameterError, ProgressSnapshot, Sample, SearchEnvelope, SearchOutcome,
	SearchParameters, SearchUpdate, SearchView, WearRange, binomial, evaluate, normalize,
};
