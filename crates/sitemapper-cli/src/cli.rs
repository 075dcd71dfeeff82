//! # CLI Structure and Argument Parsing
//!
//! `sitemapper` has a single working command today, `generate`, which reads a
//! list of locations and writes a sitemap (or a rotated set plus index).
//!
//! ```bash
//! # One URL per line, relative paths resolved against --site
//! sitemapper generate --site https://example.com --input urls.txt
//!
//! # Rotated, uncompressed output, 10k URLs per file
//! sitemapper generate --input - --rollover --per-file 10000 --no-compress < urls.txt
//!
//! # Settings from a file, machine-readable summary
//! sitemapper generate --config sitemapper.toml --input urls.txt --format json
//! ```
//!
//! Flags given on the command line override values from `--config`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI structure for the `sitemapper` command
#[derive(Parser, Clone, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "sitemapper - Build XML sitemaps with rollover and gzip output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress warnings (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate sitemap files from a list of locations
    Generate(GenerateArgs),
}

/// Output format of the run summary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON object
    Json,
}

#[derive(Args, Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateArgs {
    /// Settings file (TOML) with [site], [output] and [encoding] sections
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Site address used to resolve relative locations
    #[arg(short = 's', long, value_name = "URL", env = "SITEMAPPER_SITE")]
    pub site: Option<String>,

    /// Input file with one location or JSON object per line (`-` for stdin)
    #[arg(short = 'i', long, value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Output base path, without extension (default: `sitemap`)
    #[arg(short = 'o', long, value_name = "BASE")]
    pub output: Option<PathBuf>,

    /// Maximum number of URLs per file when rolling over
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub per_file: Option<u64>,

    /// Split output across numbered files and write a sitemap index
    #[arg(long)]
    pub rollover: bool,

    /// Write plain `.xml` instead of `.xml.gz`
    #[arg(long)]
    pub no_compress: bool,

    /// Use locations verbatim instead of percent-encoding them
    #[arg(long)]
    pub no_encode: bool,

    /// Write video fields with the `image:` prefix used by older sitemaps
    #[arg(long)]
    pub legacy_video_prefix: bool,

    /// Summary output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
