use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use wearcomb_stream::search::{SearchEnvelope, SearchStream, stream_combinations};

use super::commands::SearchCommand;

/// Launches the background search worker thread and returns communication
/// channels.
pub(crate) fn spawn() -> (Sender<SearchCommand>, Receiver<SearchEnvelope>, Arc<AtomicU64>) {
	let (command_tx, command_rx) = mpsc::channel();
	let (result_tx, result_rx) = mpsc::channel();
	let latest_run_id = Arc::new(AtomicU64::new(0));
	let thread_latest = Arc::clone(&latest_run_id);

	thread::spawn(move || worker_loop(&command_rx, &result_tx, &thread_latest));

	(command_tx, result_rx, latest_run_id)
}

fn worker_loop(
	command_rx: &Receiver<SearchCommand>,
	result_tx: &Sender<SearchEnvelope>,
	latest_run_id: &AtomicU64,
) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(result_tx, latest_run_id, command) {
			break;
		}
	}
}

fn handle_command(
	result_tx: &Sender<SearchEnvelope>,
	latest_run_id: &AtomicU64,
	command: SearchCommand,
) -> bool {
	match command {
		SearchCommand::Run {
			id,
			samples,
			params,
		} => {
			let stream = SearchStream::new(result_tx, id);
			stream_combinations(&samples, &params, &stream, latest_run_id)
		}
		SearchCommand::Shutdown => false,
	}
}
