// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printsweep Scan — address enumeration, TCP reachability probes, and the
// coordinator that fans probes out across a subnet and folds the open ports
// into a per-host discovery set.

pub mod coordinator;
pub mod prober;
pub mod range;

pub use coordinator::{ScanReport, Scanner};
pub use prober::{Prober, TcpProber};
pub use range::{ScanRange, next_address};
