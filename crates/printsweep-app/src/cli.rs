// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use printsweep_core::config::{AppConfig, DispatchMode};

/// Find printers on a subnet and optionally send each one a document.
#[derive(Debug, Parser)]
#[command(name = "printsweep", version, about)]
pub struct Cli {
    /// Range to scan in CIDR notation (e.g. 192.168.1.0/24). Prompted for
    /// when omitted.
    pub range: Option<String>,

    /// Config file to use instead of the one in the data directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Send to every discovered printer without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Stop after listing the discovered printers.
    #[arg(long)]
    pub scan_only: bool,

    /// Per-probe connect timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// How to send jobs: spooler, raw, or lpr.
    #[arg(long, value_name = "MODE", value_parser = parse_dispatch_mode)]
    pub dispatch: Option<DispatchMode>,

    /// Directory to pick the document from.
    #[arg(long, value_name = "DIR")]
    pub documents: Option<PathBuf>,

    /// Write the settings in effect (overrides included) back to the config
    /// file before scanning.
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ms) = self.timeout_ms {
            config.connect_timeout_ms = ms;
        }
        if let Some(mode) = self.dispatch {
            config.dispatch_mode = mode;
        }
        if let Some(dir) = &self.documents {
            config.document_dir = dir.clone();
        }
    }
}

fn parse_dispatch_mode(s: &str) -> Result<DispatchMode, String> {
    s.parse().map_err(|e: printsweep_core::PrintsweepError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_prompts_for_range() {
        let cli = Cli::try_parse_from(["printsweep"]).expect("parse");
        assert!(cli.range.is_none());
        assert!(!cli.yes);
        assert!(!cli.scan_only);
        assert!(!cli.save_config);
    }

    #[test]
    fn overrides_are_applied_to_config() {
        let cli = Cli::try_parse_from([
            "printsweep",
            "10.0.0.0/24",
            "--timeout-ms",
            "250",
            "--dispatch",
            "lpr",
            "--documents",
            "/srv/print",
            "-y",
        ])
        .expect("parse");
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.range.as_deref(), Some("10.0.0.0/24"));
        assert!(cli.yes);
        assert_eq!(config.connect_timeout_ms, 250);
        assert_eq!(config.dispatch_mode, DispatchMode::Lpr);
        assert_eq!(config.document_dir, PathBuf::from("/srv/print"));
    }

    #[test]
    fn unknown_dispatch_mode_is_rejected() {
        assert!(Cli::try_parse_from(["printsweep", "--dispatch", "fax"]).is_err());
    }
}
