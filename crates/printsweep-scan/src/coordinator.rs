// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan coordinator.
//
// One tokio task per (host, protocol) pair, all spawned up front into a
// `JoinSet`. Hits travel over a single bounded mpsc channel to one aggregator
// task, which owns the `DiscoverySet` outright. Probes wait on a full channel
// instead of dropping results. The coordinator releases its own sender once
// everything is spawned, joins every probe, and then collects the finished
// set from the aggregator, which stops when the last probe's sender drops.
//
// Dispatch is unbounded unless `max_in_flight` is set: a /16 against the four
// default protocols is 262 144 tasks, and each one holds a socket while it
// waits on its connect timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use printsweep_core::config::AppConfig;
use printsweep_core::error::Result;
use printsweep_core::types::{DiscoverySet, ProtocolTable, ScanResult, ScanTask};

use crate::prober::{Prober, TcpProber};
use crate::range::ScanRange;

/// Result channel capacity used when nothing else is configured.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Outcome of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The range that was scanned, normalised to its network address.
    pub range: String,
    /// Hosts with at least one open port.
    pub discovered: DiscoverySet,
    pub hosts_enumerated: u64,
    pub probes_dispatched: usize,
    /// Probes that ran to completion, hit or miss. Equals `probes_dispatched`
    /// once `scan` returns.
    pub probes_completed: usize,
    /// Probe tasks that panicked instead of returning.
    pub probes_failed: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Fans probes out across a range and gathers the open ports.
pub struct Scanner<P = TcpProber> {
    prober: Arc<P>,
    protocols: Arc<ProtocolTable>,
    channel_capacity: usize,
    max_in_flight: Option<usize>,
}

impl Scanner<TcpProber> {
    /// Build a TCP scanner from the application settings.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(
            Scanner::new(TcpProber::new(config.connect_timeout()), config.protocol_table()?)
                .with_channel_capacity(config.result_channel_capacity)
                .with_max_in_flight(config.max_in_flight),
        )
    }
}

impl<P: Prober> Scanner<P> {
    pub fn new(prober: P, protocols: ProtocolTable) -> Self {
        Self {
            prober: Arc::new(prober),
            protocols: Arc::new(protocols),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_in_flight: None,
        }
    }

    /// Set the result channel capacity. Zero is treated as one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Cap the number of probes connecting at once. `None` lifts the cap.
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit.map(|n| n.max(1));
        self
    }

    pub fn protocols(&self) -> &ProtocolTable {
        &self.protocols
    }

    /// Parse `range` and scan it.
    ///
    /// A malformed range is rejected before a single probe is spawned.
    pub async fn scan(&self, range: &str) -> Result<ScanReport> {
        let range = ScanRange::parse(range)?;
        Ok(self.scan_range(&range).await)
    }

    /// Probe every protocol on every address of `range`.
    ///
    /// Returns once every probe has finished and every hit has been folded
    /// into the report's discovery set.
    pub async fn scan_range(&self, range: &ScanRange) -> ScanReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        info!(
            range = %range,
            hosts = range.len(),
            protocols = self.protocols.len(),
            max_in_flight = ?self.max_in_flight,
            "scan started"
        );

        let (tx, rx) = mpsc::channel::<ScanResult>(self.channel_capacity);
        let aggregator = tokio::spawn(aggregate(rx));
        let limiter = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

        let mut probes = JoinSet::new();
        let mut hosts_enumerated = 0u64;
        for host in range.hosts() {
            hosts_enumerated += 1;
            for entry in self.protocols.iter() {
                let task = ScanTask::new(host, entry);
                let prober = Arc::clone(&self.prober);
                let results = tx.clone();
                let limiter = limiter.clone();
                probes.spawn(async move {
                    // Held until the probe finishes; dropped before the send
                    // so a full channel never pins a connect slot.
                    let permit = match limiter {
                        Some(sem) => sem.acquire_owned().await.ok(),
                        None => None,
                    };
                    let hit = prober.probe(task).await;
                    drop(permit);
                    if let Some(result) = hit {
                        // The aggregator holds the receiver until every
                        // sender is gone, so this only fails if it panicked.
                        let _ = results.send(result).await;
                    }
                });
            }
        }
        drop(tx);

        let probes_dispatched = probes.len();
        debug!(probes = probes_dispatched, "all probes dispatched");

        let mut probes_completed = 0;
        let mut probes_failed = 0;
        while let Some(joined) = probes.join_next().await {
            probes_completed += 1;
            if let Err(e) = joined {
                probes_failed += 1;
                warn!(error = %e, "probe task failed");
            }
        }

        let discovered = match aggregator.await {
            Ok(set) => set,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "aggregator cancelled; returning an empty set");
                DiscoverySet::new()
            }
        };

        let elapsed = clock.elapsed();
        info!(
            range = %range,
            printers = discovered.len(),
            open_ports = discovered.open_ports(),
            probes = probes_completed,
            elapsed_ms = elapsed.as_millis() as u64,
            "scan finished"
        );

        ScanReport {
            range: range.to_string(),
            discovered,
            hosts_enumerated,
            probes_dispatched,
            probes_completed,
            probes_failed,
            started_at,
            elapsed,
        }
    }
}

/// Drain the channel into a fresh set. Returns once every sender is dropped.
async fn aggregate(mut rx: mpsc::Receiver<ScanResult>) -> DiscoverySet {
    let mut discovered = DiscoverySet::new();
    while let Some(result) = rx.recv().await {
        debug!(host = %result.host, protocol = %result.protocol, "open port");
        discovered.insert(result);
    }
    discovered
}
