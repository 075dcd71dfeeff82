//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands, OutputFormat};

/// Initialize the tracing subscriber from the global flags.
///
/// Logs go to stderr so the summary on stdout stays machine-readable. JSON
/// output lowers the level to errors unless `--verbose` was given.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let machine_output = match &cli.command {
        Commands::Generate(args) => args.format == OutputFormat::Json,
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || machine_output {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var("NO_COLOR").is_ok();
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}
