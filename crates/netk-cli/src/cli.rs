//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// netk - Network K-function analysis for points on a road network.
#[derive(Debug, Parser)]
#[command(name = "netk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NETK_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the Network K-function, with an optional confidence envelope
    Analyze(AnalyzeArgs),

    /// Print the total network length
    Length(LengthArgs),

    /// Print pairwise network distances between points
    Distances(DistancesArgs),

    /// Place random points uniformly along the network
    Sample(SampleArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Network file (JSON, or TOML by extension)
    #[arg(short, long)]
    pub network: PathBuf,

    /// Points file (JSON array of {"x", "y"})
    #[arg(short, long)]
    pub points: PathBuf,

    /// Beginning distance
    #[arg(long)]
    pub begin: Option<f64>,

    /// Distance increment
    #[arg(long)]
    pub increment: Option<f64>,

    /// Number of distance bands
    #[arg(long)]
    pub bands: Option<usize>,

    /// Snap distance
    #[arg(long)]
    pub snap: Option<f64>,

    /// Random permutations for the confidence envelope (0, 9, 99 or 999 are typical)
    #[arg(long)]
    pub permutations: Option<usize>,

    /// Minimum successful trials for the envelope
    #[arg(long)]
    pub min_trials: Option<usize>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Percentile envelope instead of min/max (e.g. 2.5,97.5)
    #[arg(long)]
    pub percentile: Option<PercentileRange>,

    /// Worker threads for the permutation trials
    #[arg(long)]
    pub threads: Option<usize>,

    /// Run permutation trials on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Write the results table to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write every iteration's distances to a CSV file
    #[arg(long)]
    pub odcm_output: Option<PathBuf>,
}

/// Arguments for the length command.
#[derive(Debug, Parser)]
pub struct LengthArgs {
    /// Network file (JSON, or TOML by extension)
    #[arg(short, long)]
    pub network: PathBuf,
}

/// Arguments for the distances command.
#[derive(Debug, Parser)]
pub struct DistancesArgs {
    /// Network file (JSON, or TOML by extension)
    #[arg(short, long)]
    pub network: PathBuf,

    /// Points file (JSON array of {"x", "y"})
    #[arg(short, long)]
    pub points: PathBuf,

    /// Snap distance
    #[arg(long)]
    pub snap: Option<f64>,
}

/// Arguments for the sample command.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Network file (JSON, or TOML by extension)
    #[arg(short, long)]
    pub network: PathBuf,

    /// Number of points
    #[arg(long)]
    pub count: usize,

    /// Random seed
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Lower and upper envelope percentiles, written `LO,HI`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileRange {
    /// Lower percentile
    pub lower: f64,
    /// Upper percentile
    pub upper: f64,
}

impl FromStr for PercentileRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lower, upper) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LO,HI but got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid percentile '{}': {}", v.trim(), e))
        };
        Ok(Self {
            lower: parse(lower)?,
            upper: parse(upper)?,
        })
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Csv => crate::config::OutputFormat::Csv,
        }
    }
}
