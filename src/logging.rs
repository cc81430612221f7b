//! Tracing subscriber setup for the binary.
//!
//! Library code only emits `tracing` events; embedders may install their own
//! subscriber instead of calling this.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to warnings. Events go to
/// stderr so stdout stays reserved for results. Calling this twice is a
/// no-op.
pub fn initialize() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}
