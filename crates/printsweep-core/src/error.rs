// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printsweep.
//
// Only `InvalidRange` and `Config` end a run. Everything else is scoped to a
// single host and is logged before moving on. A probe that finds a closed
// port is not an error at all and has no variant here.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Printsweep operations.
#[derive(Debug, Error)]
pub enum PrintsweepError {
    // -- Scan errors --
    #[error("invalid IP range {input:?}: {reason}")]
    InvalidRange { input: String, reason: String },

    // -- Print errors --
    #[error("failed to send print job to {host}: {detail}")]
    Dispatch { host: String, detail: String },

    #[error("no documents found in {}", dir.display())]
    NoDocumentAvailable { dir: PathBuf },

    #[error("could not read directory {}: {source}", dir.display())]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    // -- Plumbing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrintsweepError {
    /// Shorthand for building an `InvalidRange` error.
    pub fn invalid_range(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for building a `Dispatch` error.
    pub fn dispatch(host: impl ToString, detail: impl Into<String>) -> Self {
        Self::Dispatch {
            host: host.to_string(),
            detail: detail.into(),
        }
    }

    /// Whether this error comes from the operator's input or settings. The
    /// binary exits with status 2 for these and 1 for other failures.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidRange { .. } | Self::Config(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintsweepError>;
