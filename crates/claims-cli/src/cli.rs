//! CLI argument definitions for the claim transformer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use claims_model::SchemaVariant;

#[derive(Parser)]
#[command(
    name = "claims",
    version,
    about = "Benefit claim transformer - filter, map and export claim data to Excel",
    long_about = "Transform raw benefit-claim CSV exports into a standardized Excel workbook.\n\n\
                  Keeps rows whose claim status is 'R', validates and renames columns\n\
                  according to a schema, and reports claim totals."
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

    /// Allow patient and employee values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transform a claim CSV file into an Excel workbook.
    Transform(TransformArgs),

    /// List the built-in claim layouts.
    Schemas,
}

#[derive(Parser)]
pub struct TransformArgs {
    /// Claim CSV export to transform.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Built-in source layout.
    #[arg(long = "schema", value_enum, default_value = "camel")]
    pub schema: SchemaArg,

    /// Custom schema in TOML (overrides --schema).
    #[arg(long = "schema-file", value_name = "PATH", conflicts_with = "schema")]
    pub schema_file: Option<PathBuf>,

    /// Directory for the workbook (default: the input file's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Workbook file name; `.xlsx` is appended when missing.
    #[arg(long = "filename", value_name = "NAME")]
    pub filename: Option<String>,

    /// Worksheet name (overrides the schema's).
    #[arg(long = "sheet-name", value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Largest accepted input in bytes (0 disables the check).
    #[arg(long = "max-bytes", value_name = "N")]
    pub max_bytes: Option<u64>,

    /// Largest accepted number of data rows (0 disables the check).
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Append a totals row under the data.
    #[arg(long = "totals-row")]
    pub totals_row: bool,

    /// Run and report without writing the workbook.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the run summary as JSON to this path.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    Camel,
    Spaced,
    Reduced,
}

impl From<SchemaArg> for SchemaVariant {
    fn from(value: SchemaArg) -> Self {
        match value {
            SchemaArg::Camel => Self::Camel,
            SchemaArg::Spaced => Self::Spaced,
            SchemaArg::Reduced => Self::Reduced,
        }
    }
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
