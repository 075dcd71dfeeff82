//! sitemapper CLI - build XML sitemaps from a list of locations
//!
//! Reads locations from a file or stdin, feeds them through a
//! `sitemapper_core::SitemapSession` and reports what was written.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli;
mod commands;
mod error;
mod input;
mod logging;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::initialize_logging(&cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        return ExitCode::FAILURE;
    }

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(error::exit_code_from_error(&e))
        },
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => commands::generate(args),
    }
}
