use std::fmt::Write;
use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{ArgAction, ColorChoice, Parser, ValueEnum};

use wearcomb::app_dirs;

/// Produce the full version banner including config and data directories.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };
    let data_dir = match app_dirs::get_data_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("wearcomb {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");
    let _ = writeln!(details, "data directory: {data_dir}");

    Box::leak(details.into_boxed_str())
}

/// Create the clap styles used for custom colour output.
fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into the strongly typed [`CliArgs`] structure.
pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

/// Output format for the final report.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OutputFormat {
    /// Human readable lines, streamed as matches arrive.
    Plain,
    /// A single JSON document emitted when the run finishes.
    Json,
}

/// Per-group source range override supplied on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GroupRangeArg {
    pub(crate) tag: u32,
    pub(crate) min: f64,
    pub(crate) max: f64,
}

/// Parse a `TAG=MIN:MAX` group range specification.
fn parse_group_range(text: &str) -> Result<GroupRangeArg, String> {
    let (tag_text, range_text) = text
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=MIN:MAX, got '{text}'"))?;
    let tag: u32 = tag_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid group tag '{tag_text}'"))?;
    let (min_text, max_text) = range_text
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX after '=', got '{range_text}'"))?;
    let min: f64 = min_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum wear '{min_text}'"))?;
    let max: f64 = max_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum wear '{max_text}'"))?;
    Ok(GroupRangeArg { tag, min, max })
}

#[derive(Parser, Debug)]
#[command(
    name = "wearcomb",
    version,
    long_version = long_version(),
    about = "Find sample combinations that average to a target wear value",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `wearcomb` binary.
pub(crate) struct CliArgs {
    #[arg(
        value_name = "SAMPLES",
        help = "Inline sample list, e.g. '0.103|1, 0.245|2' (default: read --input or stdin)"
    )]
    pub(crate) samples: Option<String>,
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "WEARCOMB_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Read the sample list from a file (default: stdin when no inline samples)"
    )]
    pub(crate) input: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "WEAR",
        allow_hyphen_values = true,
        help = "Desired wear value to hunt for (default: none)"
    )]
    pub(crate) desired: Option<f64>,
    #[arg(
        short,
        long,
        value_name = "WIDTH",
        help = "Tolerance window width above the desired wear (default: 0.00000001)"
    )]
    pub(crate) specificity: Option<f64>,
    #[arg(
        long = "min-wear",
        value_name = "WEAR",
        help = "Lower bound of the target wear range (default: 0.0)"
    )]
    pub(crate) min_wear: Option<f64>,
    #[arg(
        long = "max-wear",
        value_name = "WEAR",
        help = "Upper bound of the target wear range (default: 0.8)"
    )]
    pub(crate) max_wear: Option<f64>,
    #[arg(
        short = 'k',
        long = "subset-size",
        value_name = "COUNT",
        help = "Number of samples combined per candidate (default: 5)"
    )]
    pub(crate) subset_size: Option<usize>,
    #[arg(
        long = "group-range",
        value_name = "TAG=MIN:MAX",
        action = ArgAction::Append,
        value_parser = parse_group_range,
        help = "Source wear range for a sample group (default: 0:0.8 for every group)"
    )]
    pub(crate) group_range: Vec<GroupRangeArg>,
    #[arg(
        long = "count-only",
        conflicts_with = "eval",
        help = "Only report how many combinations the input would produce (default: disabled)"
    )]
    pub(crate) count_only: bool,
    #[arg(
        long,
        help = "Evaluate the input as one exact combination instead of searching (default: disabled)"
    )]
    pub(crate) eval: bool,
    #[arg(
        short,
        long,
        value_enum,
        default_value = "plain",
        help = "Output format for the final report (default: plain)"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long = "print-config",
        help = "Print the effective configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_accepts_default_arguments() {
        let parsed = CliArgs::try_parse_from(["wearcomb"]).expect("parses");
        assert_eq!(parsed.output, OutputFormat::Plain);
        assert!(parsed.samples.is_none());
        assert!(!parsed.count_only);
    }

    #[test]
    fn parse_reads_search_options() {
        let parsed = CliArgs::try_parse_from([
            "wearcomb",
            "-d",
            "0.15",
            "-s",
            "0.001",
            "-k",
            "10",
            "--group-range",
            "2=0.06:0.8",
            "0.1|1,0.2|2",
        ])
        .expect("parses");
        assert_eq!(parsed.desired, Some(0.15));
        assert_eq!(parsed.specificity, Some(0.001));
        assert_eq!(parsed.subset_size, Some(10));
        assert_eq!(
            parsed.group_range,
            vec![GroupRangeArg {
                tag: 2,
                min: 0.06,
                max: 0.8,
            }]
        );
        assert_eq!(parsed.samples.as_deref(), Some("0.1|1,0.2|2"));
    }

    #[test]
    fn count_only_conflicts_with_eval() {
        let result = CliArgs::try_parse_from(["wearcomb", "--count-only", "--eval"]);
        assert!(result.is_err());
    }

    #[test]
    fn group_range_rejects_malformed_specs() {
        assert!(parse_group_range("2=0.06:0.8").is_ok());
        assert!(parse_group_range("2-0.06:0.8").is_err());
        assert!(parse_group_range("x=0.06:0.8").is_err());
        assert!(parse_group_range("2=0.06").is_err());
    }
}
