// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LPR/LPD client (RFC 1179), port 515.
//
// One "receive a printer job" exchange per document: the queue command, then
// the control file, then the data file. Every step is acknowledged by a
// single zero byte from the daemon; anything else means the job was refused.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use printsweep_core::error::{PrintsweepError, Result};

/// Default LPD port.
pub const LPR_PORT: u16 = 515;

/// Queue used when the printer doesn't advertise one.
pub const DEFAULT_QUEUE: &str = "lp";

/// Name this client reports as the originating host.
const CLIENT_HOST: &str = "printsweep";

/// Job number embedded in the control and data file names.
const JOB_NUMBER: u16 = 1;

/// Build the RFC 1179 control file for a single plain-file job.
pub fn control_file(job_name: &str) -> String {
    let data_file = data_file_name();
    format!(
        "H{CLIENT_HOST}\nP{CLIENT_HOST}\nJ{job_name}\nl{data_file}\nU{data_file}\nN{job_name}\n"
    )
}

fn data_file_name() -> String {
    format!("dfA{JOB_NUMBER:03}{CLIENT_HOST}")
}

fn control_file_name() -> String {
    format!("cfA{JOB_NUMBER:03}{CLIENT_HOST}")
}

/// Submit `document` to `queue` on `host:port`.
pub async fn send_lpr(
    host: Ipv4Addr,
    port: u16,
    queue: &str,
    job_name: &str,
    document: &[u8],
    timeout: Duration,
) -> Result<()> {
    let addr = SocketAddr::V4(SocketAddrV4::new(host, port));
    info!(addr = %addr, queue, job = job_name, "sending job over LPR");

    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| {
            PrintsweepError::dispatch(
                host,
                format!("LPR connect to {addr} timed out after {}s", timeout.as_secs()),
            )
        })?
        .map_err(|e| PrintsweepError::dispatch(host, format!("LPR connect to {addr}: {e}")))?;

    let mut session = Session {
        host,
        stream: &mut stream,
    };

    session.write("receive job", format!("\x02{queue}\n").as_bytes()).await?;
    session.expect_ack("receive job").await?;

    let control = control_file(job_name);
    session
        .write(
            "control header",
            format!("\x02{} {}\n", control.len(), control_file_name()).as_bytes(),
        )
        .await?;
    session.expect_ack("control header").await?;
    session.write("control file", control.as_bytes()).await?;
    session.write("control terminator", &[0]).await?;
    session.expect_ack("control file").await?;

    session
        .write(
            "data header",
            format!("\x03{} {}\n", document.len(), data_file_name()).as_bytes(),
        )
        .await?;
    session.expect_ack("data header").await?;
    session.write("data file", document).await?;
    session.write("data terminator", &[0]).await?;
    session.expect_ack("data file").await?;

    info!(addr = %addr, job = job_name, bytes = document.len(), "LPR job accepted");
    Ok(())
}

struct Session<'a> {
    host: Ipv4Addr,
    stream: &'a mut TcpStream,
}

impl Session<'_> {
    async fn write(&mut self, step: &str, bytes: &[u8]) -> Result<()> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(|e| PrintsweepError::dispatch(self.host, format!("LPR {step}: {e}")))
    }

    async fn expect_ack(&mut self, step: &str) -> Result<()> {
        let mut ack = [0u8; 1];
        self.stream
            .read_exact(&mut ack)
            .await
            .map_err(|e| PrintsweepError::dispatch(self.host, format!("LPR {step} ack: {e}")))?;
        if ack[0] != 0 {
            return Err(PrintsweepError::dispatch(
                self.host,
                format!("LPR daemon rejected the {step} (code {})", ack[0]),
            ));
        }
        debug!(step, "LPR ack");
        Ok(())
    }
}
