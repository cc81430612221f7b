//! Command-line surface: argument parsing and report output.

mod args;
mod output;

pub(crate) use args::{CliArgs, OutputFormat, parse_cli};
pub(crate) use output::{format_match, print_json, print_plain};
