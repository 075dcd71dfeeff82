//! Command to build sitemap files from a list of locations

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use sitemapper_core::{SessionSummary, SiteConfig, SitemapSession, SitemapSettings};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::cli::{GenerateArgs, OutputFormat};
use crate::error::CliError;
use crate::input::parse_line;

/// Execute the generate command
pub fn execute(args: &GenerateArgs) -> Result<()> {
    let config = resolve_config(args)?;
    debug!(?config, "Resolved configuration");

    let mut session = SitemapSession::new(config);

    if args.input == Path::new("-") {
        read_entries(io::stdin().lock(), &mut session)?;
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open input {}", args.input.display()))?;
        read_entries(BufReader::new(file), &mut session)?;
    }

    let summary = session.finish().context("Failed to write sitemap")?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize summary to JSON")?;
            println!("{json}");
        },
        OutputFormat::Text => print_text_summary(&summary),
    }

    Ok(())
}

/// Settings file first, then command-line overrides.
fn resolve_config(args: &GenerateArgs) -> Result<SiteConfig> {
    let mut builder = match &args.config {
        Some(path) => SitemapSettings::load(path)?.into_builder(),
        None => SiteConfig::builder(),
    };

    if let Some(site) = &args.site {
        builder = builder.site_address(site.as_str());
    }
    if let Some(output) = &args.output {
        builder = builder.output(output);
    }
    if let Some(per_file) = args.per_file {
        let per_file = usize::try_from(per_file)
            .map_err(|_| CliError::usage(anyhow!("--per-file {per_file} is too large")))?;
        builder = builder.per_file(per_file);
    }
    if args.rollover {
        builder = builder.auto_save(true);
    }
    if args.no_compress {
        builder = builder.compression(false);
    }
    if args.no_encode {
        builder = builder.auto_encode(false);
    }
    if args.legacy_video_prefix {
        builder = builder.legacy_video_prefix(true);
    }

    Ok(builder.build()?)
}

fn read_entries<R: BufRead>(reader: R, session: &mut SitemapSession) -> Result<()> {
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        let line_no = number + 1;

        if let Some(entry) = parse_line(&line).with_context(|| format!("line {line_no}"))? {
            session
                .add_entry(entry)
                .with_context(|| format!("line {line_no}"))?;
        }
    }
    Ok(())
}

fn print_text_summary(summary: &SessionSummary) {
    let files = summary.files.len();
    println!(
        "{} {} {} to {} {}",
        "Wrote".green().bold(),
        summary.total_entries,
        if summary.total_entries == 1 { "URL" } else { "URLs" },
        files,
        if files == 1 { "file" } else { "files" },
    );
    for file in &summary.files {
        println!("  {}", file.display());
    }
    if let Some(index) = &summary.index {
        println!("{} {}", "Index:".bold(), index.display());
    }
}
