// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR pattern decoder backed by `rqrr`.

use qrecho_core::error::{QrEchoError, Result};
use qrecho_core::types::{CHANNELS, DecodedSymbol, Dimensions, EcLevel};
use rqrr::PreparedImage;
use tracing::{debug, instrument, warn};

/// Decoder that locates QR finder patterns and decodes the first readable grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl crate::traits::PatternDecoder for RqrrDecoder {
    #[instrument(skip(self, rgba))]
    fn decode_binarized(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<DecodedSymbol>> {
        Dimensions::new(width, height).validate_rgba(rgba.len())?;
        let w = width as usize;
        let mut prepared = PreparedImage::prepare_from_bitmap(w, height as usize, |x, y| {
            rgba[(y * w + x) * CHANNELS] < 128
        });
        Ok(first_symbol(prepared.detect_grids()))
    }

    #[instrument(skip(self, gray))]
    fn decode_gray(&self, gray: &[u8], width: u32, height: u32) -> Result<Option<DecodedSymbol>> {
        let dims = Dimensions::new(width, height);
        if dims.pixel_count() != Some(gray.len()) || gray.is_empty() {
            return Err(QrEchoError::InvalidDimensions {
                width,
                height,
                len: gray.len(),
            });
        }
        let w = width as usize;
        let mut prepared =
            PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| gray[y * w + x]);
        Ok(first_symbol(prepared.detect_grids()))
    }
}

/// Decode grids in detection order and keep the first that yields a payload.
fn first_symbol<G: rqrr::BitGrid>(grids: Vec<rqrr::Grid<G>>) -> Option<DecodedSymbol> {
    debug!(candidates = grids.len(), "Grids detected");
    for grid in grids {
        match grid.decode() {
            Ok((meta, payload)) => {
                return Some(DecodedSymbol {
                    payload,
                    version: Some(meta.version.0),
                    ec_level: EcLevel::from_format_bits(meta.ecc_level),
                });
            }
            Err(err) => warn!(error = %err, "Grid found but could not be decoded"),
        }
    }
    None
}
