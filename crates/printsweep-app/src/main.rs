// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printsweep — find printers on a subnet and send each one a document.
//
// Entry point. Loads config, initialises logging, scans the requested range,
// lists what answered, then offers each printer a randomly chosen document.

mod batch;
mod cli;
mod console;
mod logging;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use printsweep_core::config::{self, AppConfig};
use printsweep_core::error::{PrintsweepError, Result};
use printsweep_core::human_errors::humanize_error;
use printsweep_print::{Dispatcher, DocumentSelector};
use printsweep_scan::{ScanRange, Scanner};

use crate::cli::Cli;
use crate::console::Console;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!(
            "Could not create log file {}: {e}",
            config.log_file.display()
        );
        return ExitCode::FAILURE;
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    match run(&cli, &config, &mut console).await {
        Ok(()) => {
            info!("Execution completed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run aborted");
            fail(&e)
        }
    }
}

/// Print a run-ending error to stderr and pick the exit status for it.
fn fail(err: &PrintsweepError) -> ExitCode {
    let human = humanize_error(err);
    eprintln!("{} {}", human.message, human.suggestion);
    ExitCode::from(exit_status(err))
}

/// 2 for bad input or settings, 1 for anything else that ends the run.
fn exit_status(err: &PrintsweepError) -> u8 {
    if err.is_fatal() { 2 } else { 1 }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(config::default_config_path)
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = config_path(cli);
    let mut config = AppConfig::load(&path)?;
    cli.apply(&mut config);
    config.validate()?;
    if cli.save_config {
        config.save(&path)?;
    }
    Ok(config)
}

async fn run<R: io::BufRead, W: io::Write>(
    cli: &Cli,
    config: &AppConfig,
    console: &mut Console<R, W>,
) -> Result<()> {
    let input = match &cli.range {
        Some(range) => range.trim().to_string(),
        None => console.prompt_range()?,
    };
    let range = ScanRange::parse(&input)?;

    let scanner = Scanner::from_config(config)?;
    console.say(format!(
        "Scanning {range} for {} protocol(s)...",
        scanner.protocols().len()
    ))?;
    let report = scanner.scan_range(&range).await;
    info!(
        range = %report.range,
        started_at = %report.started_at.to_rfc3339(),
        hosts = report.hosts_enumerated,
        probes = report.probes_completed,
        failed_probes = report.probes_failed,
        printers = report.discovered.len(),
        "discovery complete"
    );
    console.report_discovery(&report)?;

    if cli.scan_only || report.discovered.is_empty() {
        return Ok(());
    }

    let selector = DocumentSelector::new(&config.document_dir, &config.document_extensions);
    let dispatcher = Dispatcher::from_config(config);
    info!(
        printers = report.discovered.len(),
        document_dir = %selector.dir().display(),
        mode = ?dispatcher.mode(),
        "print round starting"
    );
    let summary = batch::print_to_all(
        console,
        &report.discovered,
        &selector,
        &dispatcher,
        cli.yes,
    )
    .await?;

    info!(
        sent = summary.sent,
        failed = summary.failed,
        declined = summary.declined,
        no_document = summary.no_document,
        "print round finished"
    );
    console.say(format!(
        "{} sent, {} failed, {} skipped.",
        summary.sent,
        summary.failed,
        summary.declined + summary.no_document
    ))?;
    Ok(())
}
