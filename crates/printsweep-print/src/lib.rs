// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printsweep Print — picks a document to print and gets it to a discovered
// printer, either through the local spooler or by talking to the printer
// directly over raw TCP or LPR.

pub mod dispatch;
pub mod lpr_client;
pub mod raw_client;
pub mod selector;

pub use dispatch::Dispatcher;
pub use selector::{DocumentSelector, select_random_document};
