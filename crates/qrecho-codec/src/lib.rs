// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qrecho-codec: Barcode collaborators for qrecho.
//
// The pipeline only talks to the `PatternDecoder` and `BarcodeEncoder` traits.
// The default implementations wrap `rqrr` for detection and `qrcode` for
// rendering, plus PNG export of the rendered code.

pub mod decoder;
pub mod encoder;
pub mod traits;

pub use decoder::RqrrDecoder;
pub use encoder::{QrCodeEncoder, gray_to_frame, save_png, to_png_bytes};
pub use traits::{BarcodeEncoder, PatternDecoder};
