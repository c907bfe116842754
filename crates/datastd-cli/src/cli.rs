//! CLI argument definitions for datastd.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use datastd_model::RunDefaults;

#[derive(Parser)]
#[command(
    name = "datastd",
    version,
    about = "Standardize tables with JSON column mappings",
    long_about = "Map source tables onto target tables with a JSON mapping payload.\n\n\
                  Independent entries for one target are stacked; relational entries\n\
                  are outer-joined on their shared key."
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

    /// Allow row-level values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module path in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Suppress span close events in JSON logs.
    #[arg(long = "no-log-spans", global = true)]
    pub no_log_spans: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a mapping payload and write the target tables.
    Run(RunArgs),

    /// Validate a mapping payload without reading or writing any table.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the JSON mapping payload.
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    /// Directory holding the source tables as CSV files.
    #[arg(
        long = "source-dir",
        value_name = "DIR",
        env = "DATASTD_SOURCE_DIR",
        default_value = "."
    )]
    pub source_dir: PathBuf,

    /// Directory the target tables are written to (default: the source directory).
    #[arg(long = "target-dir", value_name = "DIR", env = "DATASTD_TARGET_DIR")]
    pub target_dir: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Map and merge every target without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Summary output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: SummaryFormatArg,
}

impl RunArgs {
    pub fn target_dir(&self) -> PathBuf {
        self.target_dir
            .clone()
            .unwrap_or_else(|| self.source_dir.clone())
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the JSON mapping payload.
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: SummaryFormatArg,
}

/// Fallback target for entries that do not name one.
#[derive(Args, Clone, Default)]
pub struct TargetArgs {
    /// Default target schema.
    #[arg(long = "schema", value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Default target table.
    #[arg(long = "table", value_name = "TABLE")]
    pub table: Option<String>,
}

impl TargetArgs {
    pub fn defaults(&self) -> RunDefaults {
        RunDefaults::new(self.schema.clone(), self.table.clone())
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormatArg {
    #[default]
    Table,
    Json,
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
