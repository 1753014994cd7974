// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw TCP print client (JetDirect, port 9100).
//
// Open a socket, write the document, shut the write half down. There is no
// reply to wait for, so success only means the bytes left this host. The
// printer has to understand the document format on its own.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use printsweep_core::error::{PrintsweepError, Result};

/// Default raw TCP port (HP JetDirect).
pub const RAW_PORT: u16 = 9100;

const CHUNK_SIZE: usize = 8192;

/// Send `document` to `host:port` and close the connection.
pub async fn send_raw(host: Ipv4Addr, port: u16, document: &[u8], timeout: Duration) -> Result<()> {
    let addr = SocketAddr::V4(SocketAddrV4::new(host, port));
    info!(addr = %addr, bytes = document.len(), "sending job over raw TCP");

    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| {
            PrintsweepError::dispatch(
                host,
                format!("raw TCP connect to {addr} timed out after {}s", timeout.as_secs()),
            )
        })?
        .map_err(|e| PrintsweepError::dispatch(host, format!("raw TCP connect to {addr}: {e}")))?;

    let mut sent = 0usize;
    for chunk in document.chunks(CHUNK_SIZE) {
        stream.write_all(chunk).await.map_err(|e| {
            PrintsweepError::dispatch(host, format!("raw TCP send failed at byte {sent}: {e}"))
        })?;
        sent += chunk.len();
        debug!(sent, total = document.len(), "raw TCP progress");
    }

    stream
        .shutdown()
        .await
        .map_err(|e| PrintsweepError::dispatch(host, format!("raw TCP shutdown: {e}")))?;

    info!(addr = %addr, bytes = sent, "raw TCP job sent");
    Ok(())
}
