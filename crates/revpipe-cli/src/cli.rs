//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "revpipe",
    version,
    about = "Partner revenue enrichment pipeline",
    long_about = "Enrich per-partner advertising revenue extracts through \
                  lookup-driven tagging stages and emit the normalized \
                  reporting sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process the Hearst extract.
    Hearst(RunArgs),

    /// Process the Boston extract.
    Boston(RunArgs),

    /// Process the Houston extract.
    Houston(RunArgs),

    /// Process the Pittsburgh extract.
    Pittsburgh(RunArgs),

    /// List all supported partners.
    Partners,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Root data directory containing <partner>/raw and lookups/.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Shared lookup directory (default: <DATA_DIR>/lookups).
    #[arg(long = "lookup-dir", value_name = "DIR")]
    pub lookup_dir: Option<PathBuf>,

    /// Output directory (default: <DATA_DIR>/<partner>/processed).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run the pipeline and report without writing the output sheet.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
