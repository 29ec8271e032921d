// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges the command line to the qrecho backend crates.
//
// The scan service runs the load, binarize, decode and re-encode pipeline and
// returns reports the front end can print directly.

pub mod config_dir;
pub mod scan_service;
