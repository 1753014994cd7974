// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The print round that follows a scan.
//
// Printers are visited one at a time in address order. Errors whose severity
// is `Skipped` (a missing document, an unreadable folder, a failed job) are
// reported and counted, and the round carries on with the next printer. Any
// other error ends the round.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use printsweep_core::error::{PrintsweepError, Result};
use printsweep_core::human_errors::{HumanError, Severity, humanize_error};
use printsweep_core::types::DiscoverySet;
use printsweep_print::{Dispatcher, DocumentSelector};

use crate::console::Console;

/// Tally of one print round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub declined: usize,
    pub no_document: usize,
}

/// Offer a job to every discovered printer.
pub async fn print_to_all<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    discovered: &DiscoverySet,
    selector: &DocumentSelector,
    dispatcher: &Dispatcher,
    assume_yes: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for host in discovered.hosts() {
        if !assume_yes && !console.confirm(host)? {
            summary.declined += 1;
            continue;
        }

        let document = match selector.select() {
            Ok(path) => path,
            Err(e) => {
                warn!(host = %host, error = %e, "no document to print");
                let human = skip_or_stop(e)?;
                console.show_error(&human)?;
                summary.no_document += 1;
                continue;
            }
        };

        info!(
            host = %host,
            protocols = ?discovered.protocols(&host),
            document = %document.display(),
            "attempting to send document"
        );
        match dispatcher.dispatch(host, &document).await {
            Ok(output) => {
                info!(host = %host, document = %document.display(), "document sent");
                if output.is_empty() {
                    console.say(format!("Print job submitted to {host}."))?;
                } else {
                    console.say(format!(
                        "Print job submitted successfully. Output: {output}"
                    ))?;
                }
                summary.sent += 1;
            }
            Err(e) => {
                warn!(host = %host, error = %e, "failed to send document");
                let human = skip_or_stop(e)?;
                console.show_error(&human)?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Hand back the message for an error that only costs this printer, or the
/// error itself when it should end the round.
fn skip_or_stop(err: PrintsweepError) -> Result<HumanError> {
    let human = humanize_error(&err);
    match human.severity {
        Severity::Skipped => Ok(human),
        Severity::ActionRequired | Severity::Permanent => Err(err),
    }
}
