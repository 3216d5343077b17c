//! CLI argument definitions for `lca-flows`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lca-flows",
    version,
    about = "LCA flow pipeline - turn flowsheet results into registry-resolved LCA flows",
    long_about = "Turn the stream results of a process flowsheet into LCA-ready flows.\n\n\
                  Each run converts quantities into LCA units, normalizes them to the\n\
                  functional unit and resolves every flow against a flow registry.\n\
                  Raw, converted, normalized and finalized tables are kept for audit."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a recorded flowsheet and run every stage.
    Run(RunArgs),

    /// Run the pipeline on an existing raw flow table.
    Convert(ConvertArgs),

    /// Print the effective conversion-factor table.
    Units(UnitsArgs),

    /// Search a flow registry by keywords.
    Search(SearchArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Flowsheet recording (TOML) to replay.
    #[arg(value_name = "FLOWSHEET")]
    pub flowsheet: PathBuf,

    /// Pipeline configuration (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Flow registry (CSV).
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: PathBuf,

    /// Output directory for stage tables (default: <FLOWSHEET dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Raw flow table (CSV) with at least flow_name, quantity, unit, flow_role.
    #[arg(value_name = "RAW_CSV")]
    pub raw_csv: PathBuf,

    /// Pipeline configuration (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Flow registry (CSV).
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: PathBuf,

    /// Output directory for stage tables (default: <RAW_CSV dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct UnitsArgs {
    /// Pipeline configuration whose factor file and operating hours apply.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Flow registry (CSV).
    #[arg(value_name = "REGISTRY")]
    pub registry: PathBuf,

    /// Words matched against flow names and aliases.
    #[arg(value_name = "KEYWORDS", required = true, num_args = 1..)]
    pub keywords: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_joins_keywords() {
        let cli = Cli::parse_from(["lca-flows", "search", "flows.csv", "sulfuric", "acid"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.keywords, vec!["sulfuric", "acid"]);
    }

    #[test]
    fn run_requires_a_registry() {
        assert!(Cli::try_parse_from(["lca-flows", "run", "flowsheet.toml"]).is_err());
    }
}
