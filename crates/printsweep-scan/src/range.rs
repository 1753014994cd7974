// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// IPv4 range parsing and host enumeration.
//
// A range is written `a.b.c.d/prefix`. Enumeration starts at the masked
// network address and walks upwards one address at a time until it leaves
// the range. The network and broadcast addresses are part of the walk: a
// printer squatting on either of them is still worth finding.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;

use printsweep_core::error::{PrintsweepError, Result};

/// A parsed IPv4 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    network: Ipv4Network,
}

impl ScanRange {
    /// Parse `a.b.c.d/prefix`. Host bits in the address are allowed and
    /// masked off when enumerating.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (addr, prefix) = trimmed
            .split_once('/')
            .ok_or_else(|| PrintsweepError::invalid_range(trimmed, "missing '/prefix'"))?;

        let addr = Ipv4Addr::from_str(addr).map_err(|e| {
            PrintsweepError::invalid_range(trimmed, format!("bad IPv4 address {addr:?}: {e}"))
        })?;
        let prefix: u8 = prefix.parse().map_err(|_| {
            PrintsweepError::invalid_range(trimmed, format!("bad prefix length {prefix:?}"))
        })?;
        let network = Ipv4Network::new(addr, prefix)
            .map_err(|e| PrintsweepError::invalid_range(trimmed, e.to_string()))?;

        Ok(Self { network })
    }

    /// First address of the range (the address with host bits cleared).
    pub fn base(&self) -> Ipv4Addr {
        self.network.network()
    }

    /// Last address of the range.
    pub fn last(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(addr)
    }

    /// Number of addresses in the range, network and broadcast included.
    pub fn len(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    /// Never true: even a /32 holds one address.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every address in the range in ascending order.
    pub fn hosts(&self) -> Hosts {
        Hosts {
            range: *self,
            next: Some(self.base()),
        }
    }
}

impl FromStr for ScanRange {
    type Err = PrintsweepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base(), self.prefix())
    }
}

/// Lazy iterator over the addresses of a [`ScanRange`].
#[derive(Debug, Clone)]
pub struct Hosts {
    range: ScanRange,
    next: Option<Ipv4Addr>,
}

impl Iterator for Hosts {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Ipv4Addr> {
        let current = self.next.filter(|addr| self.range.contains(*addr))?;
        let (following, wrapped) = next_address(current);
        self.next = (!wrapped).then_some(following);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(addr) if self.range.contains(addr) => {
                u64::from(u32::from(self.range.last()) - u32::from(addr)) + 1
            }
            _ => 0,
        };
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// The address one above `addr`, carrying across octets.
///
/// The flag is `true` when the increment wrapped past `255.255.255.255`.
pub fn next_address(addr: Ipv4Addr) -> (Ipv4Addr, bool) {
    let (next, wrapped) = u32::from(addr).overflowing_add(1);
    (Ipv4Addr::from(next), wrapped)
}
