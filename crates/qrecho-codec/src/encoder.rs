// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode rendering backed by `qrcode`, and PNG export of the result.

use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use qrecho_core::config::RenderConfig;
use qrecho_core::error::{QrEchoError, Result};
use qrecho_core::types::{EcLevel, RgbaFrame};
use tracing::{debug, info, instrument};

/// Width of the light border around a symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Renders QR codes module by module into a grayscale image.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl crate::traits::BarcodeEncoder for QrCodeEncoder {
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    fn encode(&self, payload: &str, render: &RenderConfig) -> Result<GrayImage> {
        let scale = render.module_size;
        if scale == 0 {
            return Err(QrEchoError::Encode("module size must be at least 1 pixel".into()));
        }

        let code = QrCode::with_error_correction_level(payload.as_bytes(), qr_level(render.ec_level))
            .map_err(|err| QrEchoError::Encode(err.to_string()))?;
        let modules = code.width() as u32;
        let colors = code.to_colors();
        let quiet = if render.quiet_zone { QUIET_ZONE_MODULES } else { 0 };

        let side = (modules + 2 * quiet)
            .checked_mul(scale)
            .ok_or_else(|| QrEchoError::Encode(format!("module size {scale} is too large")))?;
        debug!(modules, side, "Rendering symbol");

        let img = GrayImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / scale, y / scale);
            if mx < quiet || my < quiet || mx >= quiet + modules || my >= quiet + modules {
                return LIGHT;
            }
            let idx = ((my - quiet) * modules + (mx - quiet)) as usize;
            match colors[idx] {
                Color::Dark => DARK,
                Color::Light => LIGHT,
            }
        });
        Ok(img)
    }
}

fn qr_level(level: EcLevel) -> qrcode::EcLevel {
    match level {
        EcLevel::Low => qrcode::EcLevel::L,
        EcLevel::Medium => qrcode::EcLevel::M,
        EcLevel::Quartile => qrcode::EcLevel::Q,
        EcLevel::High => qrcode::EcLevel::H,
    }
}

/// Expand a grayscale image into an opaque RGBA frame.
pub fn gray_to_frame(img: &GrayImage) -> RgbaFrame {
    let data = img.as_raw().iter().flat_map(|&v| [v, v, v, 255]).collect();
    RgbaFrame {
        width: img.width(),
        height: img.height(),
        data,
    }
}

/// Encode a rendered code as PNG bytes.
pub fn to_png_bytes(img: &GrayImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| QrEchoError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write a rendered code to `path` as PNG.
#[instrument(skip(img, path), fields(path = %path.display()))]
pub fn save_png(img: &GrayImage, path: &Path) -> Result<()> {
    let bytes = to_png_bytes(img)?;
    std::fs::write(path, bytes)?;
    info!(width = img.width(), "Regenerated code written");
    Ok(())
}
