//! `breedkit` command-line entry point.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use breedkit_io_fs::{ReportSample, SampleTreeError, SpecSampleConfig, sample_tree};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("breedkit={level},breedkit_io_fs={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let mut stdout = io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when any breed failed.
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let cfg_file = match &cli.config {
        Some(path) => SpecSampleConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SpecSampleConfig::default(),
    };
    let cfg = cfg_file.merge(cli.to_config());
    debug!(?cfg, "resolved configuration");

    let dir_source = cfg.dir_source();
    let dir_destination = cfg.dir_destination();
    let spec_sample_options = cfg.to_options(cli.dry_run);
    let if_dry_run = spec_sample_options.if_dry_run;

    let report = match sample_tree(&dir_source, &dir_destination, spec_sample_options) {
        Ok(v) => v,
        Err(err @ SampleTreeError::SourceMissing(_)) => {
            writeln!(out, "Error: {err}")?;
            return Ok(true);
        }
        Err(err) => return Err(err.into()),
    };
    info!("{report}");

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        render_report(&report, &dir_destination, if_dry_run, out)?;
    }

    Ok(report.is_success())
}

fn render_report(
    report: &ReportSample,
    dir_destination: &std::path::Path,
    if_dry_run: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    if report.if_created_destination {
        let verb = if if_dry_run { "Would create" } else { "Created" };
        writeln!(
            out,
            "{verb} destination directory: {}",
            dir_destination.display()
        )?;
    }
    writeln!(out, "Found {} breed folders.", report.cnt_categories)?;

    if if_dry_run {
        for spec_outcome in &report.categories {
            for selection in &spec_outcome.selections {
                writeln!(
                    out,
                    "{} -> {}",
                    selection.path_src.display(),
                    selection.path_dst.display()
                )?;
            }
            for path_stale in &spec_outcome.stale_removed {
                writeln!(out, "remove {}", path_stale.display())?;
            }
        }
    }

    for spec_error in &report.errors {
        writeln!(
            out,
            "Failed [{}] {}: {}",
            spec_error.category,
            spec_error.path.display(),
            spec_error.exception
        )?;
    }

    if report.is_success() {
        if if_dry_run {
            writeln!(out, "Dry run complete; nothing was copied.")?;
        } else {
            writeln!(out, "Successfully copied images for all breeds.")?;
        }
    } else {
        writeln!(
            out,
            "Finished with {} failed breed(s).",
            report.error_count()
        )?;
    }
    Ok(())
}
