// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// TCP reachability probe.
//
// A probe is a bare connect with a deadline. If the handshake completes the
// socket is dropped on the spot, with no protocol exchange, so a hit only
// says the port is open. Refused, unreachable, and timed-out connects are
// the normal case across a subnet and come back as `None`.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::trace;

use printsweep_core::types::{ScanResult, ScanTask};

/// Connect timeout used when nothing else is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Something that can decide whether a task's port is open.
pub trait Prober: Send + Sync + 'static {
    /// Probe once. `Some` only when the port accepted a connection.
    fn probe(&self, task: ScanTask) -> impl Future<Output = Option<ScanResult>> + Send;
}

/// Probes by opening (and immediately closing) a TCP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Prober for TcpProber {
    async fn probe(&self, task: ScanTask) -> Option<ScanResult> {
        let addr = task.socket_addr();
        match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Some(task.into_result())
            }
            Ok(Err(e)) => {
                trace!(addr = %addr, protocol = %task.protocol, error = %e, "port closed");
                None
            }
            Err(_) => {
                trace!(
                    addr = %addr,
                    protocol = %task.protocol,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "connect timed out"
                );
                None
            }
        }
    }
}
