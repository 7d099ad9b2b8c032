//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fiscal",
    version,
    about = "Fiscal reference resolvers - registry enrichment and variable lookup",
    long_about = "Enrich taxpayer records with RUT registry attributes and resolve\n\
                  fiscal variable codes to canonical names by tax year."
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

    /// Allow taxpayer identifiers to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file with registry and variable settings.
    #[arg(long = "config", value_name = "TOML", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join registry attributes onto taxpayer records.
    Enrich(EnrichArgs),

    /// Resolve a variable code to its canonical name for a tax year.
    Lookup(LookupArgs),

    /// Retype text cells that look numeric.
    Clean(CleanArgs),
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Taxpayer records (CSV with header).
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Registry extract (CSV with header).
    #[arg(long = "registry", value_name = "CSV")]
    pub registry: PathBuf,

    /// Identifier column on the input (default: numero_identificacion).
    #[arg(long = "id-field", value_name = "NAME")]
    pub id_field: Option<String>,

    /// Write the enriched table here instead of printing a preview.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct LookupArgs {
    /// Variable metadata reference table (CSV with header).
    #[arg(long = "metadata", value_name = "CSV")]
    pub metadata: PathBuf,

    /// Tax form code, e.g. 210.
    #[arg(long = "format", value_name = "ID")]
    pub format_id: i64,

    /// Variable code, e.g. VAR_33 or FE_VAR_0007.
    #[arg(long = "var", value_name = "CODE")]
    pub var_code: String,

    /// Tax year to resolve for.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: i64,

    /// Column to include in the composed name (repeatable, in order).
    #[arg(long = "compose", value_name = "FIELD")]
    pub compose: Vec<String>,

    /// Separator for the composed name.
    #[arg(long = "sep", value_name = "S")]
    pub separator: Option<String>,

    /// Year substituted for "Vigente" (default: this calendar year).
    #[arg(long = "current-year", value_name = "YEAR")]
    pub current_year: Option<i64>,

    /// Print the result as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Table to clean (CSV with header, read as text).
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Write the cleaned table here instead of printing a preview.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Convert zero-padded digit strings to numbers too.
    #[arg(long = "no-keep-leading-zero-ids")]
    pub no_keep_leading_zero_ids: bool,
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
