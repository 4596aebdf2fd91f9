//! CLI argument definitions for the `melt` converter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "melt",
    version,
    about = "Reshape department-by-month tables into long format",
    long_about = "Reshape department-by-month statistics tables into long format.\n\n\
                  Each input row is one department with one column per YYYY-MM month.\n\
                  Each output row is one (department, month) pair with derived year\n\
                  and month labels and a sequence number."
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

    /// Configuration file (default: melt.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// Column naming overrides shared by all subcommands.
#[derive(Args)]
pub struct ColumnArgs {
    /// Header of the department column.
    #[arg(long = "category-column", value_name = "HEADER", global = true)]
    pub category_column: Option<String>,

    /// Header of the total column to drop.
    #[arg(long = "aggregate-column", value_name = "HEADER", global = true)]
    pub aggregate_column: Option<String>,

    /// Treat every non-department column as a month column.
    #[arg(
        long = "no-aggregate-column",
        global = true,
        conflicts_with = "aggregate_column"
    )]
    pub no_aggregate_column: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert files (or every spreadsheet in a directory) to long format.
    Convert(ConvertArgs),

    /// Reshape one file and print the first rows of the result.
    Preview(PreviewArgs),

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Input files or directories.
    #[arg(value_name = "INPUTS", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving the converted files.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Output file name, once per input in order (default: <PREFIX><input name>).
    #[arg(long = "output-name", value_name = "NAME")]
    pub output_names: Vec<String>,

    /// Prefix for default output names.
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Reshape and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Number of files converted concurrently.
    #[arg(short = 'j', long = "jobs", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Write CSV output without a UTF-8 byte order mark.
    #[arg(long = "no-bom")]
    pub no_bom: bool,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of long-format rows to print.
    #[arg(long = "rows", short = 'n', value_name = "N", default_value_t = 12)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
