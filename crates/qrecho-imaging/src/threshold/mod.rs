// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thresholding: summed-area table and the local-mean adaptive binarizer.

pub mod binarizer;
pub mod integral;

pub use binarizer::AdaptiveBinarizer;
pub use integral::SummedAreaTable;
