// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Luminance conversion with BT.601 weights over R, G, B.

use qrecho_core::error::Result;
use qrecho_core::types::{CHANNELS, Dimensions};

/// Red weight, in thousandths.
pub const WEIGHT_R: u32 = 299;
/// Green weight, in thousandths.
pub const WEIGHT_G: u32 = 587;
/// Blue weight, in thousandths.
pub const WEIGHT_B: u32 = 114;
/// Scale of [`luminance_milli`] relative to [`luminance`].
pub const SCALE: u32 = 1000;

/// Luminance of one pixel, `0.299 R + 0.587 G + 0.114 B`, in `0.0..=255.0`.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    luminance_milli(r, g, b) as f32 / SCALE as f32
}

/// Luminance scaled by 1000 as an exact integer in `0..=255_000`.
///
/// The weights sum to exactly 1000, so a gray pixel `(v, v, v)` maps to
/// `v * 1000` with no rounding.
pub fn luminance_milli(r: u8, g: u8, b: u8) -> u32 {
    WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32
}

/// Read-only luminance of every pixel in an RGBA buffer.
///
/// Materialised before any pixel is overwritten so that thresholds never see
/// already-binarized neighbours.
#[derive(Debug, Clone)]
pub struct LuminancePlane {
    width: u32,
    height: u32,
    values: Vec<u32>,
}

impl LuminancePlane {
    /// Compute the plane for an RGBA buffer, validating its dimensions.
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Result<Self> {
        Dimensions::new(width, height).validate_rgba(data.len())?;
        let values = data
            .chunks_exact(CHANNELS)
            .map(|px| luminance_milli(px[0], px[1], px[2]))
            .collect();
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scaled luminance at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// One row of scaled luminance values.
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.values[start..start + w]
    }

    /// Round to 8-bit gray, one byte per pixel.
    pub fn to_gray_bytes(&self) -> Vec<u8> {
        self.values
            .iter()
            .map(|&v| ((v + SCALE / 2) / SCALE).min(255) as u8)
            .collect()
    }
}
