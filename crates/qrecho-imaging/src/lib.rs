// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrecho-imaging: Pixel-level preprocessing for qrecho.
//
// Provides luminance conversion, the summed-area-table backed adaptive
// binarizer that conditions photographs for the pattern decoder, and image
// acquisition (file/bytes to RGBA pixel buffer).

pub mod acquire;
pub mod luminance;
pub mod threshold;

// Re-export the primary entry points so callers can use `qrecho_imaging::AdaptiveBinarizer` etc.
pub use luminance::{LuminancePlane, luminance, luminance_milli};
pub use threshold::binarizer::{AdaptiveBinarizer, binarize_in_place, binarize_reference};
pub use threshold::integral::SummedAreaTable;
