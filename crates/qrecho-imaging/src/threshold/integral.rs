// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Summed-area table over a luminance plane, for constant-time window sums.

use crate::luminance::LuminancePlane;

/// Integral image of scaled luminance.
///
/// `table[y * (width+1) + x]` contains the sum of all values in the rectangle
/// `[0, x) × [0, y)`. The table has dimensions `(width+1) x (height+1)` with a
/// zero-padded top row and left column.
#[derive(Debug, Clone)]
pub struct SummedAreaTable {
    width: u32,
    height: u32,
    table: Vec<u64>,
}

impl SummedAreaTable {
    /// Build the table for a luminance plane.
    pub fn from_plane(plane: &LuminancePlane) -> Self {
        let (w, h) = (plane.width(), plane.height());
        let stride = w as usize + 1;
        let mut table = vec![0u64; stride * (h as usize + 1)];

        for y in 0..h {
            let mut row_sum: u64 = 0;
            for (x, &value) in plane.row(y).iter().enumerate() {
                row_sum += value as u64;
                let idx = (y as usize + 1) * stride + x + 1;
                let above = y as usize * stride + x + 1;
                table[idx] = row_sum + table[above];
            }
        }

        Self {
            width: w,
            height: h,
            table,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sum over the half-open rectangle `[x0, x1) × [y0, y1)`.
    ///
    /// Coordinates must already be clipped to the image.
    #[inline]
    pub fn sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        debug_assert!(x0 <= x1 && x1 <= self.width);
        debug_assert!(y0 <= y1 && y1 <= self.height);
        let stride = self.width as usize + 1;
        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);

        // S = I[y1][x1] - I[y0][x1] - I[y1][x0] + I[y0][x0], reordered to stay non-negative.
        self.table[y1 * stride + x1] + self.table[y0 * stride + x0]
            - self.table[y0 * stride + x1]
            - self.table[y1 * stride + x0]
    }

    /// Sum and pixel count of the square window of half-extent `half`
    /// around `(cx, cy)`: `[cx - half, cx + half) × [cy - half, cy + half)`,
    /// clipped to the image.
    #[inline]
    pub fn window(&self, cx: u32, cy: u32, half: u32) -> (u64, u64) {
        let x0 = cx.saturating_sub(half);
        let y0 = cy.saturating_sub(half);
        let x1 = cx.saturating_add(half).min(self.width);
        let y1 = cy.saturating_add(half).min(self.height);
        let count = (x1 - x0) as u64 * (y1 - y0) as u64;
        (self.sum(x0, y0, x1, y1), count)
    }
}
