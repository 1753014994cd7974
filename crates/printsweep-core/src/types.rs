// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Printsweep scanner.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

use crate::error::{PrintsweepError, Result};

/// A named printing protocol and the TCP port it is expected on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub name: String,
    pub port: u16,
}

impl ProtocolEntry {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// The set of `(protocol, port)` pairs probed on every host.
///
/// Names are unique. The table is fixed once built; every probe of a scan
/// reads from the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolTable {
    entries: Vec<ProtocolEntry>,
}

impl ProtocolTable {
    /// Build a table, rejecting empty or duplicate protocol names.
    pub fn new(entries: Vec<ProtocolEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(PrintsweepError::Config(format!(
                    "protocol on port {} has an empty name",
                    entry.port
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(PrintsweepError::Config(format!(
                    "protocol {:?} is listed more than once",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Printing-protocol ports probed by default.
    pub fn printers() -> Self {
        Self {
            entries: vec![
                ProtocolEntry::new("IPP", 631),
                ProtocolEntry::new("AirPrint", 5353),
                ProtocolEntry::new("RAW", 9100),
                ProtocolEntry::new("LPD", 515),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProtocolTable {
    fn default() -> Self {
        Self::printers()
    }
}

/// One probe to perform: a host, a port, and the protocol it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub host: Ipv4Addr,
    pub port: u16,
    pub protocol: String,
}

impl ScanTask {
    pub fn new(host: Ipv4Addr, entry: &ProtocolEntry) -> Self {
        Self {
            host,
            port: entry.port,
            protocol: entry.name.clone(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }

    /// The result this task reports when its port turns out to be open.
    pub fn into_result(self) -> ScanResult {
        ScanResult {
            host: self.host,
            protocol: self.protocol,
        }
    }
}

/// An open port found during a scan.
///
/// Only ever produced for a successful connect. It means "something accepted
/// a TCP connection on the protocol's port", not that the device speaks the
/// protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanResult {
    pub host: Ipv4Addr,
    pub protocol: String,
}

/// Hosts with at least one open printing port, each with the protocols found.
///
/// Hosts iterate in ascending address order and protocols in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySet {
    hosts: BTreeMap<Ipv4Addr, BTreeSet<String>>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a result into the set. Returns `true` if the protocol was new for
    /// this host.
    pub fn insert(&mut self, result: ScanResult) -> bool {
        self.hosts
            .entry(result.host)
            .or_default()
            .insert(result.protocol)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn protocols(&self, host: &Ipv4Addr) -> Option<&BTreeSet<String>> {
        self.hosts.get(host)
    }

    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.hosts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &BTreeSet<String>)> {
        self.hosts.iter()
    }

    /// Total number of `(host, protocol)` pairs recorded.
    pub fn open_ports(&self) -> usize {
        self.hosts.values().map(BTreeSet::len).sum()
    }
}

impl Extend<ScanResult> for DiscoverySet {
    fn extend<I: IntoIterator<Item = ScanResult>>(&mut self, iter: I) {
        for result in iter {
            self.insert(result);
        }
    }
}

impl FromIterator<ScanResult> for DiscoverySet {
    fn from_iter<I: IntoIterator<Item = ScanResult>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(host: [u8; 4], protocol: &str) -> ScanResult {
        ScanResult {
            host: Ipv4Addr::from(host),
            protocol: protocol.into(),
        }
    }

    #[test]
    fn default_table_is_the_printer_ports() {
        let table = ProtocolTable::default();
        assert_eq!(table.len(), 4);
        let ports: Vec<(&str, u16)> = table.iter().map(|e| (e.name.as_str(), e.port)).collect();
        assert_eq!(
            ports,
            vec![("IPP", 631), ("AirPrint", 5353), ("RAW", 9100), ("LPD", 515)]
        );
    }

    #[test]
    fn duplicate_protocol_names_are_rejected() {
        let err = ProtocolTable::new(vec![
            ProtocolEntry::new("IPP", 631),
            ProtocolEntry::new("IPP", 8631),
        ])
        .unwrap_err();
        assert!(matches!(err, PrintsweepError::Config(_)));
    }

    #[test]
    fn blank_protocol_name_is_rejected() {
        assert!(ProtocolTable::new(vec![ProtocolEntry::new("  ", 631)]).is_err());
    }

    #[test]
    fn same_port_under_two_names_is_allowed() {
        let table = ProtocolTable::new(vec![
            ProtocolEntry::new("IPP", 631),
            ProtocolEntry::new("IPPS", 631),
        ])
        .expect("distinct names");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn discovery_set_deduplicates_hosts_and_protocols() {
        let mut set = DiscoverySet::new();
        assert!(set.insert(hit([10, 0, 0, 5], "IPP")));
        assert!(set.insert(hit([10, 0, 0, 5], "RAW")));
        assert!(!set.insert(hit([10, 0, 0, 5], "IPP")));
        assert!(set.insert(hit([10, 0, 0, 2], "LPD")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.open_ports(), 3);
        let protocols: Vec<_> = set
            .protocols(&Ipv4Addr::new(10, 0, 0, 5))
            .expect("host present")
            .iter()
            .cloned()
            .collect();
        assert_eq!(protocols, vec!["IPP", "RAW"]);
    }

    #[test]
    fn hosts_iterate_in_address_order() {
        let set: DiscoverySet = [
            hit([192, 168, 1, 20], "IPP"),
            hit([192, 168, 1, 3], "RAW"),
            hit([192, 168, 0, 250], "LPD"),
        ]
        .into_iter()
        .collect();
        let hosts: Vec<_> = set.hosts().collect();
        assert_eq!(
            hosts,
            vec![
                Ipv4Addr::new(192, 168, 0, 250),
                Ipv4Addr::new(192, 168, 1, 3),
                Ipv4Addr::new(192, 168, 1, 20),
            ]
        );
    }

    #[test]
    fn task_reports_its_own_host_and_protocol() {
        let entry = ProtocolEntry::new("RAW", 9100);
        let task = ScanTask::new(Ipv4Addr::new(10, 1, 2, 3), &entry);
        assert_eq!(task.socket_addr().to_string(), "10.1.2.3:9100");
        assert_eq!(task.into_result(), hit([10, 1, 2, 3], "RAW"));
    }
}
