use wearcomb_stream::search::{Sample, SearchParameters};

/// Commands understood by the background search worker.
#[derive(Debug)]
pub(crate) enum SearchCommand {
	/// Execute a combination search run.
	Run {
		/// Identifier correlating stream envelopes with the originating run.
		id: u64,
		/// Samples captured for the lifetime of the run.
		samples: Vec<Sample>,
		/// Validated run parameters.
		params: SearchParameters,
	},
	/// Stop the background worker thread.
	Shutdown,
}
