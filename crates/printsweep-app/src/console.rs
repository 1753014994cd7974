// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal prompts and reporting.
//
// Generic over the reader and writer so the interactive flow can be driven
// from byte buffers in tests.

use std::io::{BufRead, Write};

use printsweep_core::error::Result;
use printsweep_core::human_errors::HumanError;
use printsweep_scan::ScanReport;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for the range to scan. Returns the trimmed answer.
    pub fn prompt_range(&mut self) -> Result<String> {
        self.ask("Enter IP range in CIDR notation (e.g., 192.168.1.0/24): ")
    }

    /// Ask before sending a job. Only `y`/`Y` counts as yes; end of input
    /// counts as no.
    pub fn confirm(&mut self, host: impl std::fmt::Display) -> Result<bool> {
        let answer = self.ask(&format!("Confirm sending print job to {host} (y/n): "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// List every discovered printer with the protocols seen on it.
    pub fn report_discovery(&mut self, report: &ScanReport) -> Result<()> {
        if report.discovered.is_empty() {
            writeln!(self.output, "No printers discovered in {}.", report.range)?;
            return Ok(());
        }
        writeln!(self.output, "Discovered printers:")?;
        for (host, protocols) in report.discovered.iter() {
            let protocols: Vec<&str> = protocols.iter().map(String::as_str).collect();
            writeln!(self.output, "{host}  [{}]", protocols.join(", "))?;
        }
        Ok(())
    }

    pub fn say(&mut self, line: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn show_error(&mut self, error: &HumanError) -> Result<()> {
        writeln!(self.output, "{} {}", error.message, error.suggestion)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use printsweep_core::types::{DiscoverySet, ScanResult};

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn range_prompt_trims_the_answer() {
        let mut c = console("  192.168.1.0/24 \n");
        assert_eq!(c.prompt_range().expect("read"), "192.168.1.0/24");
        let out = String::from_utf8(c.into_output()).expect("utf8");
        assert!(out.starts_with("Enter IP range in CIDR notation"));
    }

    #[test]
    fn only_y_confirms() {
        let mut c = console("Y\nyes\nn\n");
        assert!(c.confirm("10.0.0.1").expect("read"));
        assert!(!c.confirm("10.0.0.2").expect("read"));
        assert!(!c.confirm("10.0.0.3").expect("read"));
        assert!(!c.confirm("10.0.0.4").expect("eof is no"));
    }

    #[test]
    fn report_lists_hosts_with_protocols() {
        let discovered: DiscoverySet = [
            ScanResult {
                host: Ipv4Addr::new(10, 0, 0, 9),
                protocol: "RAW".into(),
            },
            ScanResult {
                host: Ipv4Addr::new(10, 0, 0, 9),
                protocol: "IPP".into(),
            },
        ]
        .into_iter()
        .collect();
        let report = ScanReport {
            range: "10.0.0.0/24".into(),
            discovered,
            hosts_enumerated: 256,
            probes_dispatched: 1024,
            probes_completed: 1024,
            probes_failed: 0,
            started_at: chrono::Utc::now(),
            elapsed: Duration::from_secs(3),
        };

        let mut c = console("");
        c.report_discovery(&report).expect("write");
        let out = String::from_utf8(c.into_output()).expect("utf8");
        assert_eq!(out, "Discovered printers:\n10.0.0.9  [IPP, RAW]\n");
    }
}
