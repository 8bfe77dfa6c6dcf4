//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ruleout_cli::pipeline::{DEFAULT_CATALOG_OUTPUT, DEFAULT_INPUT, DEFAULT_OUTPUT};

#[derive(Parser)]
#[command(
    name = "ruleout",
    version,
    about = "Export pseudonymized rule-out cohorts from trial case exports",
    long_about = "Read a structured trial export, flatten every case into one row keyed by a\n\
                  pseudonymous identifier, and write the cohort as CSV.\n\n\
                  Identity attributes are hashed and never written to the table."
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

    /// Prefix log lines with timestamps (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module path in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Show identity attribute values in clear text in logs and summaries.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export the cohort table (and optionally the label catalog).
    Export(ExportArgs),

    /// Write the label catalog of every field in the export.
    Catalog(CatalogArgs),

    /// List the fields of the first case.
    Fields(FieldsArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Trial export to read.
    #[arg(short = 'i', long = "input", value_name = "XML", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Cohort table to write.
    #[arg(short = 'o', long = "output", value_name = "CSV", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Cohort definition (TOML). Defaults to the built-in rule-out cohort.
    #[arg(long = "cohort", value_name = "FILE")]
    pub cohort: Option<PathBuf>,

    /// Also write the label catalog to this path.
    #[arg(long = "catalog", value_name = "CSV")]
    pub catalog: Option<PathBuf>,

    /// Exit with status 2 when any case was dropped.
    #[arg(long = "fail-on-dropped")]
    pub fail_on_dropped: bool,
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Trial export to read.
    #[arg(short = 'i', long = "input", value_name = "XML", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Catalog to write.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "CSV",
        default_value = DEFAULT_CATALOG_OUTPUT
    )]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Trial export to read.
    #[arg(short = 'i', long = "input", value_name = "XML", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
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
