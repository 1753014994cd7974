// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language error messages for the command line.
//
// Every error is mapped to a one-line summary plus a suggestion. During a
// print round, a `Skipped` error moves on to the next printer and anything
// else ends the round.

use crate::error::PrintsweepError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only this printer is affected; the batch continues.
    Skipped,
    /// Operator must fix their input or settings before anything can run.
    ActionRequired,
    /// Nothing sensible can be done by retrying.
    Permanent,
}

/// A human-readable error with a summary and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PrintsweepError` into something worth printing to a terminal.
pub fn humanize_error(err: &PrintsweepError) -> HumanError {
    match err {
        PrintsweepError::InvalidRange { input, reason } => HumanError {
            message: format!("\"{input}\" is not a valid IP range ({reason})."),
            suggestion: "Use CIDR notation such as 192.168.1.0/24.".into(),
            severity: Severity::ActionRequired,
        },

        PrintsweepError::Dispatch { host, detail } => HumanError {
            message: format!("The print job for {host} didn't go through."),
            suggestion: dispatch_suggestion(detail),
            severity: Severity::Skipped,
        },

        PrintsweepError::NoDocumentAvailable { dir } => HumanError {
            message: format!("There's nothing to print in {}.", dir.display()),
            suggestion: "Put at least one PDF in that folder, or point document_dir somewhere else."
                .into(),
            severity: Severity::Skipped,
        },

        PrintsweepError::DirectoryUnreadable { dir, .. } => HumanError {
            message: format!("{} can't be read.", dir.display()),
            suggestion: "Check the folder exists and that you have permission to list it.".into(),
            severity: Severity::Skipped,
        },

        PrintsweepError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or delete the config file and run again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        PrintsweepError::Io(e) => HumanError {
            message: "A file or network operation failed.".into(),
            suggestion: format!("Details: {e}"),
            severity: Severity::Permanent,
        },

        PrintsweepError::Serialization(e) => HumanError {
            message: "Some data couldn't be read or written.".into(),
            suggestion: format!("Details: {e}"),
            severity: Severity::Permanent,
        },
    }
}

fn dispatch_suggestion(detail: &str) -> String {
    let lower = detail.to_ascii_lowercase();
    if lower.contains("no such file") || lower.contains("not found") {
        "The print spooler command isn't installed. Install CUPS (which provides `lp`) or switch dispatch_mode to raw or lpr.".into()
    } else if lower.contains("timed out") {
        "The printer stopped answering. Check it is still switched on.".into()
    } else if lower.contains("refused") {
        "The printer turned the connection down. Try a different dispatch mode.".into()
    } else if lower.contains("rejected") {
        "The printer refused the job. It may need a different queue name or format.".into()
    } else {
        format!("Check the printer and try again. ({detail})")
    }
}
