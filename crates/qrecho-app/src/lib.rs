// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrecho-app: Front-end state and services behind the `qrecho` binary.

pub mod cli;
pub mod controller;
pub mod services;
