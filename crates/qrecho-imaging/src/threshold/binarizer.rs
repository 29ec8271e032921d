// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive binarization: local-mean thresholding of an RGBA buffer in place.
//
// Each pixel is compared against the mean luminance of the square window
// `[x - half, x + half) × [y - half, y + half)` clipped to the image. Pixels
// strictly darker than their local mean become black (0), all others white
// (255). The result is written into R, G and B; alpha is left as-is.

use qrecho_core::config::BinarizerConfig;
use qrecho_core::error::Result;
use qrecho_core::types::{CHANNELS, Dimensions, RgbaFrame};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::luminance::LuminancePlane;
use crate::threshold::integral::SummedAreaTable;

/// Output value for pixels darker than their local mean.
pub const FOREGROUND: u8 = 0;
/// Output value for every other pixel.
pub const BACKGROUND: u8 = 255;

/// Local-mean binarizer backed by a summed-area table.
///
/// Thresholds are computed from a luminance plane captured before the buffer
/// is touched, so the result does not depend on scan order and rows can be
/// classified in parallel.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveBinarizer {
    config: BinarizerConfig,
}

impl AdaptiveBinarizer {
    /// Create a binarizer, rejecting windows narrower than 2 pixels.
    pub fn new(config: BinarizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Sequential binarizer with the given window side length.
    pub fn with_window(window_size: u32) -> Result<Self> {
        Self::new(BinarizerConfig {
            window_size,
            parallel: false,
        })
    }

    pub fn config(&self) -> &BinarizerConfig {
        &self.config
    }

    /// Binarize an RGBA buffer in place.
    ///
    /// Fails with `InvalidDimensions` (leaving the buffer untouched) when the
    /// buffer length is not `width * height * 4` or either side is zero.
    pub fn binarize_in_place(&self, data: &mut [u8], width: u32, height: u32) -> Result<()> {
        let plane = LuminancePlane::from_rgba(data, width, height)?;
        self.binarize_with_plane(data, &plane)
    }

    /// Binarize `data` against a luminance plane the caller already computed
    /// from it, so the plane can be reused afterwards.
    ///
    /// The plane must describe `data`: its dimensions are checked against the
    /// buffer length, its values are trusted.
    #[instrument(
        skip(self, data, plane),
        fields(data_len = data.len(), window = self.config.window_size, parallel = self.config.parallel)
    )]
    pub fn binarize_with_plane(&self, data: &mut [u8], plane: &LuminancePlane) -> Result<()> {
        let (width, height) = (plane.width(), plane.height());
        Dimensions::new(width, height).validate_rgba(data.len())?;
        let table = SummedAreaTable::from_plane(plane);
        let half = self.config.half_extent();
        debug!(width, height, half, "Summed-area table built");

        let row_len = width as usize * CHANNELS;
        if self.config.parallel {
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| classify_row(row, y as u32, plane, &table, half));
        } else {
            data.chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| classify_row(row, y as u32, plane, &table, half));
        }

        let foreground = data
            .chunks_exact(CHANNELS)
            .filter(|px| px[0] == FOREGROUND)
            .count();
        info!(width, height, foreground, "Adaptive binarization complete");
        Ok(())
    }

    /// Binarize an owned frame in place.
    pub fn binarize_frame(&self, frame: &mut RgbaFrame) -> Result<()> {
        let (width, height) = (frame.width, frame.height);
        self.binarize_in_place(&mut frame.data, width, height)
    }
}

/// Binarize `data` in place with the given settings.
pub fn binarize_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    config: &BinarizerConfig,
) -> Result<()> {
    AdaptiveBinarizer::new(*config)?.binarize_in_place(data, width, height)
}

/// Direct per-pixel window scan, `O(width × height × window²)`.
///
/// Produces output identical to [`AdaptiveBinarizer`]; kept as the
/// executable definition of the algorithm for verification and benchmarks.
pub fn binarize_reference(data: &mut [u8], width: u32, height: u32, window_size: u32) -> Result<()> {
    let config = BinarizerConfig {
        window_size,
        parallel: false,
    };
    config.validate()?;
    let plane = LuminancePlane::from_rgba(data, width, height)?;
    let half = config.half_extent();

    for y in 0..height {
        let y0 = y.saturating_sub(half);
        let y1 = y.saturating_add(half).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(half);
            let x1 = x.saturating_add(half).min(width);

            let mut sum = 0u64;
            let mut count = 0u64;
            for wy in y0..y1 {
                for wx in x0..x1 {
                    sum += plane.get(wx, wy) as u64;
                    count += 1;
                }
            }

            let i = (y as usize * width as usize + x as usize) * CHANNELS;
            write_class(&mut data[i..i + CHANNELS], classify(plane.get(x, y), sum, count));
        }
    }
    Ok(())
}

fn classify_row(
    row: &mut [u8],
    y: u32,
    plane: &LuminancePlane,
    table: &SummedAreaTable,
    half: u32,
) {
    for (x, (px, &lum)) in row
        .chunks_exact_mut(CHANNELS)
        .zip(plane.row(y))
        .enumerate()
    {
        let (sum, count) = table.window(x as u32, y, half);
        write_class(px, classify(lum, sum, count));
    }
}

/// `lum < sum / count`, evaluated exactly as `lum * count < sum`.
#[inline]
fn classify(lum: u32, sum: u64, count: u64) -> u8 {
    if (lum as u64) * count < sum {
        FOREGROUND
    } else {
        BACKGROUND
    }
}

#[inline]
fn write_class(px: &mut [u8], value: u8) {
    px[0] = value;
    px[1] = value;
    px[2] = value;
}

// -- Tests --------------------------------------------------------------------
