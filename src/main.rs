mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;
use workflow::{RunMode, SearchWorkflow};

fn main() -> Result<()> {
	let cli = parse_cli();
	wearcomb::logging::initialize();

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	let mode = if cli.count_only {
		RunMode::CountOnly
	} else if cli.eval {
		RunMode::Eval
	} else {
		RunMode::Search
	};

	run_search(mode, cli.output, resolved)
}

/// Execute the selected workflow and print output in the chosen format.
fn run_search(mode: RunMode, format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
	let workflow = SearchWorkflow::new(settings, mode, format);
	let report = workflow.run()?;

	match format {
		OutputFormat::Plain => print_plain(&report),
		OutputFormat::Json => print_json(&report)?,
	}

	Ok(())
}
