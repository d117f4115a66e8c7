//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "drug-reconcile",
    version,
    about = "Reconcile clinical-trial drug names against the curated compound roster",
    long_about = "Reconcile clinical-trial drug names against the curated compound roster.\n\n\
                  Matches every drug in the trial export to a roster compound through its\n\
                  names and aliases, writes the roster with trial lists attached, and lists\n\
                  unmatched names with identifiers suggested by PubChem."
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
    /// Match trial drugs to the roster and write merged output and missing-list.
    Reconcile(ReconcileArgs),

    /// Look up compound identifiers for the given names.
    Lookup(LookupArgs),

    /// Show drug mention counts and trial types in the trial export.
    Stats(StatsArgs),

    /// Add missing names PubChem does not know to the ignore-list.
    IgnoreUnresolved(IgnoreArgs),
}

/// Where the configuration and data live.
#[derive(Args)]
pub struct SourceArgs {
    /// TOML run configuration.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the data files (overrides `paths.data_dir`).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Skip the PubChem lookup; uncached names are marked skipped.
    #[arg(long = "offline")]
    pub offline: bool,

    /// Query every missing name again instead of reusing the previous answers.
    #[arg(long = "refresh-lookups", conflicts_with = "offline")]
    pub refresh_lookups: bool,

    /// Fail when two compounds claim the same alias.
    #[arg(long = "strict-synonyms")]
    pub strict_synonyms: bool,

    /// What to do with a trial reaching the same compound twice.
    #[arg(long = "duplicates", value_enum)]
    pub duplicates: Option<DuplicatesArg>,

    /// How trials are rendered in the merged output.
    #[arg(long = "trial-display", value_enum)]
    pub trial_display: Option<TrialDisplayArg>,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Reconcile and print the summary without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct LookupArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Drug names to look up.
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of drugs to show.
    #[arg(long = "top", value_name = "N", default_value_t = 25)]
    pub top: usize,
}

#[derive(Args)]
pub struct IgnoreArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the proposed entries without touching the ignore-list.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicatesArg {
    Collapse,
    Keep,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TrialDisplayArg {
    Html,
    Id,
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
