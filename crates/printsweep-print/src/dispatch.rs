// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print job dispatch.
//
// The default path hands the file to the local spooler (`lp -d <host>
// <file>`) and leaves queueing to it. The raw and LPR modes skip the spooler
// and talk to the printer themselves. A failure here only ever concerns one
// host; the caller logs it and moves on.

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use printsweep_core::config::{AppConfig, DispatchMode};
use printsweep_core::error::{PrintsweepError, Result};

use crate::lpr_client::{self, DEFAULT_QUEUE, LPR_PORT};
use crate::raw_client::{self, RAW_PORT};

/// Timeout for connecting to a printer in the direct modes.
const DIRECT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends one file to one printer.
#[derive(Debug, Clone)]
pub enum Dispatcher {
    /// Run the spooler command with `-d <host> <file>`.
    Spooler { command: String },
    /// Stream the file to the printer's JetDirect port.
    Raw { port: u16, timeout: Duration },
    /// Submit through an LPD queue.
    Lpr {
        port: u16,
        queue: String,
        timeout: Duration,
    },
}

impl Dispatcher {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.dispatch_mode {
            DispatchMode::Spooler => Self::Spooler {
                command: config.spooler_command.clone(),
            },
            DispatchMode::Raw => Self::Raw {
                port: RAW_PORT,
                timeout: DIRECT_CONNECT_TIMEOUT,
            },
            DispatchMode::Lpr => Self::Lpr {
                port: LPR_PORT,
                queue: DEFAULT_QUEUE.into(),
                timeout: DIRECT_CONNECT_TIMEOUT,
            },
        }
    }

    pub fn mode(&self) -> DispatchMode {
        match self {
            Self::Spooler { .. } => DispatchMode::Spooler,
            Self::Raw { .. } => DispatchMode::Raw,
            Self::Lpr { .. } => DispatchMode::Lpr,
        }
    }

    /// Send `path` to the printer at `host`.
    ///
    /// Returns whatever the spooler printed on success (empty for the direct
    /// modes).
    pub async fn dispatch(&self, host: Ipv4Addr, path: &Path) -> Result<String> {
        info!(host = %host, document = %path.display(), mode = ?self.mode(), "dispatching print job");
        match self {
            Self::Spooler { command } => run_spooler(command, host, path).await,
            Self::Raw { port, timeout } => {
                let document = read_document(host, path).await?;
                raw_client::send_raw(host, *port, &document, *timeout).await?;
                Ok(String::new())
            }
            Self::Lpr {
                port,
                queue,
                timeout,
            } => {
                let document = read_document(host, path).await?;
                let job_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "printsweep".into());
                lpr_client::send_lpr(host, *port, queue, &job_name, &document, *timeout).await?;
                Ok(String::new())
            }
        }
    }
}

async fn read_document(host: Ipv4Addr, path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        PrintsweepError::dispatch(host, format!("could not read {}: {e}", path.display()))
    })
}

/// Run `<command> -d <host> <path>` and fold stdout and stderr together.
async fn run_spooler(command: &str, host: Ipv4Addr, path: &Path) -> Result<String> {
    let output = Command::new(command)
        .arg("-d")
        .arg(host.to_string())
        .arg(path)
        .output()
        .await
        .map_err(|e| PrintsweepError::dispatch(host, format!("could not run {command}: {e}")))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim().to_string();

    if output.status.success() {
        info!(host = %host, output = %combined, "print job submitted");
        Ok(combined)
    } else {
        warn!(host = %host, status = %output.status, output = %combined, "spooler refused job");
        Err(PrintsweepError::dispatch(
            host,
            format!("{command} failed ({})\nOutput: {combined}", output.status),
        ))
    }
}
