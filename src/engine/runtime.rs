use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};

use wearcomb_stream::search::{
	ParameterError, Sample, SearchEnvelope, SearchParameters,
};

use super::commands::SearchCommand;
use super::worker;

/// Run identifier meaning "no run is live"; real identifiers start at 1.
const NO_RUN: u64 = 0;

/// Owner of the background worker and the shared supersede token.
pub struct SearchRuntime {
	command_tx: Sender<SearchCommand>,
	results: Receiver<SearchEnvelope>,
	latest_run_id: Arc<AtomicU64>,
	next_run_id: u64,
}

/// Cancellation handle for a single run.
#[derive(Debug)]
pub struct SearchHandle {
	id: u64,
	latest_run_id: Arc<AtomicU64>,
}

impl SearchRuntime {
	/// Spawn the worker thread.
	#[must_use]
	pub fn spawn() -> Self {
		let (command_tx, results, latest_run_id) = worker::spawn();
		Self {
			command_tx,
			results,
			latest_run_id,
			next_run_id: NO_RUN,
		}
	}

	/// Validate `params` against `samples` and begin a run.
	///
	/// Validation failures are reported synchronously, before any enumeration
	/// starts. Starting a run supersedes whichever run is still in flight;
	/// the worker handles commands serially, so the superseded run reaches
	/// its terminal flush before the new one begins.
	pub fn start_search(
		&mut self,
		samples: Vec<Sample>,
		params: SearchParameters,
	) -> Result<SearchHandle, ParameterError> {
		params.validate(samples.len())?;
		self.next_run_id += 1;
		let id = self.next_run_id;
		self.latest_run_id.store(id, Ordering::Release);
		tracing::debug!(id, samples = samples.len(), "search queued");
		let handle = SearchHandle {
			id,
			latest_run_id: Arc::clone(&self.latest_run_id),
		};
		// A failed send means the worker died with the consumer; envelopes
		// for this run simply never arrive.
		let _ = self.command_tx.send(SearchCommand::Run {
			id,
			samples,
			params,
		});
		Ok(handle)
	}

	/// Stream of envelopes produced by runs, in emission order.
	#[must_use]
	pub fn results(&self) -> &Receiver<SearchEnvelope> {
		&self.results
	}

	/// Request cooperative cancellation of whichever run is live.
	pub fn cancel_current(&self) {
		self.latest_run_id.store(NO_RUN, Ordering::Release);
	}

	/// Ask the worker to exit once the queued runs have finished.
	pub fn shutdown(self) {
		let _ = self.command_tx.send(SearchCommand::Shutdown);
	}
}

impl SearchHandle {
	/// Identifier correlating this run with its stream envelopes.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Request cooperative cancellation of this run.
	///
	/// Has no effect when a newer run already superseded this one; the token
	/// then belongs to that run.
	pub fn cancel(&self) {
		let _ = self.latest_run_id.compare_exchange(
			self.id,
			NO_RUN,
			Ordering::AcqRel,
			Ordering::Acquire,
		);
	}

	/// Whether this run is no longer the live one.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.latest_run_id.load(Ordering::Acquire) != self.id
	}
}
