//! Streaming primitives for delivering search results across threads, plus
//! the combination-search engine that produces them.
//!
//! The base types wrap an [`mpsc`] channel so a background run can stream
//! updates back to a consumer without blocking it. Every message travels in a
//! [`StreamEnvelope`] carrying the run identifier and a `complete` flag, so
//! receivers can correlate traffic with the run that produced it and know
//! when a run has said its last word.
//!
//! `wearcomb_stream::search` builds on top by providing a ready-to-use,
//! non-blocking combination search loop: given a sample list and search
//! parameters it streams batches of matching combinations back to the
//! consumer, reports progress at a fixed cadence, and aborts when a newer run
//! supersedes it.
//!
//! Base usage:
//! ```
//! use std::sync::mpsc;
//!
//! use wearcomb_stream::{DataStream, StreamEnvelope};
//!
//! let (tx, rx) = mpsc::channel::<StreamEnvelope<(), u64>>();
//! let stream = DataStream::new(&tx, 1, ());
//! stream.send(42, true);
//! let envelope = rx.recv().unwrap();
//! assert_eq!(envelope.payload, 42);
//! assert!(envelope.complete);
//! ```
//! [`mpsc`]: std::sync::mpsc

use std::sync::mpsc::Sender;

/// Message emitted by a background run and delivered to the consumer.
pub struct StreamEnvelope<M, P> {
	/// Identifier correlating the message with a run.
	pub id: u64,
	/// Stream-specific metadata describing the payload.
	pub kind: M,
	/// Payload delivered to the consumer.
	pub payload: P,
	/// Whether the producer finished streaming for this identifier.
	pub complete: bool,
}

impl<M, P> StreamEnvelope<M, P> {
	/// Transform the payload while preserving the envelope metadata.
	pub fn map_payload<N>(self, f: impl FnOnce(P) -> N) -> StreamEnvelope<M, N> {
		StreamEnvelope {
			id: self.id,
			kind: self.kind,
			payload: f(self.payload),
			complete: self.complete,
		}
	}
}

/// Handle for producing stream messages backed by an [`mpsc::Sender`].
///
/// [`mpsc::Sender`]: std::sync::mpsc::Sender
pub struct DataStream<'a, M, P> {
	tx: &'a Sender<StreamEnvelope<M, P>>,
	id: u64,
	kind: M,
}

impl<'a, M: Clone, P: Send + 'static> DataStream<'a, M, P> {
	/// Create a new handle backed by the provided sender.
	#[must_use]
	pub fn new(tx: &'a Sender<StreamEnvelope<M, P>>, id: u64, kind: M) -> Self {
		Self { tx, id, kind }
	}

	/// Identifier associated with this stream.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Metadata associated with each emitted payload.
	#[must_use]
	pub fn kind(&self) -> &M {
		&self.kind
	}

	/// Emit a payload to the consumer.
	///
	/// Returns `false` when the receiving side hung up.
	pub fn send(&self, payload: P, complete: bool) -> bool {
		self.tx
			.send(StreamEnvelope {
				id: self.id,
				kind: self.kind.clone(),
				payload,
				complete,
			})
			.is_ok()
	}

	/// Clone the underlying sender so additional producers can emit messages.
	pub fn clone_sender(&self) -> Sender<StreamEnvelope<M, P>> {
		self.tx.clone()
	}
}

impl<'a, M: Clone, P: Send + 'static> Clone for DataStream<'a, M, P> {
	fn clone(&self) -> Self {
		Self {
			tx: self.tx,
			id: self.id,
			kind: self.kind.clone(),
		}
	}
}

/// Combination search engine built on top of the base streaming primitives.
pub mod search;
