// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator seams between the binarization pipeline and barcode libraries.

use image::GrayImage;
use qrecho_core::config::RenderConfig;
use qrecho_core::error::Result;
use qrecho_core::types::DecodedSymbol;

/// Locate and decode a 2D barcode.
///
/// "Nothing found" is `Ok(None)`, not an error. Errors are reserved for
/// malformed input buffers.
pub trait PatternDecoder: Send + Sync {
    /// Decode from a binarized RGBA buffer where every pixel is `(0,0,0,A)`
    /// or `(255,255,255,A)`. Dark pixels are taken as-is; the decoder applies
    /// no thresholding of its own.
    fn decode_binarized(&self, rgba: &[u8], width: u32, height: u32)
    -> Result<Option<DecodedSymbol>>;

    /// Decode from 8-bit grayscale, one byte per pixel, letting the decoder
    /// choose its own thresholds.
    fn decode_gray(&self, gray: &[u8], width: u32, height: u32) -> Result<Option<DecodedSymbol>>;
}

/// Render a payload as a fresh barcode.
pub trait BarcodeEncoder: Send + Sync {
    /// Render `payload` as a grayscale image: dark modules 0, light 255.
    fn encode(&self, payload: &str, render: &RenderConfig) -> Result<GrayImage>;
}
