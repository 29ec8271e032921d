// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image acquisition: decode files or in-memory bytes (PNG, JPEG, GIF, BMP,
// WebP, ...) into RGBA pixel buffers, and write buffers back out as PNG.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use qrecho_core::error::{QrEchoError, Result};
use qrecho_core::types::RgbaFrame;
use tracing::{debug, info, instrument};

/// Decode raw encoded bytes (JPEG, PNG, etc.) into an RGBA frame.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn from_bytes(data: &[u8]) -> Result<RgbaFrame> {
    let img = image::load_from_memory(data)
        .map_err(|err| QrEchoError::ImageLoad(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    into_frame(img.to_rgba8())
}

/// Decode an image file into an RGBA frame.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<Path>) -> Result<RgbaFrame> {
    let img = image::open(path.as_ref()).map_err(|err| {
        QrEchoError::ImageLoad(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    into_frame(img.to_rgba8())
}

/// Load an image file on the blocking pool.
///
/// Resolves to the decoded frame or an `ImageLoad` error; callers stay on the
/// async side while the decode runs.
pub async fn load(path: impl Into<PathBuf>) -> Result<RgbaFrame> {
    let path = path.into();
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || open(&path))
        .await
        .map_err(|err| QrEchoError::ImageLoad(format!("loading {display} was aborted: {err}")))?
}

/// Encode a frame as PNG bytes.
pub fn to_png_bytes(frame: &RgbaFrame) -> Result<Vec<u8>> {
    let img = to_image(frame)?;
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| QrEchoError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write a frame to a file. The format is inferred from the file extension.
pub fn save(frame: &RgbaFrame, path: impl AsRef<Path>) -> Result<()> {
    to_image(frame)?.save(path.as_ref()).map_err(|err| {
        QrEchoError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

fn into_frame(rgba: RgbaImage) -> Result<RgbaFrame> {
    let (width, height) = rgba.dimensions();
    RgbaFrame::new(width, height, rgba.into_raw())
}

fn to_image(frame: &RgbaFrame) -> Result<RgbaImage> {
    RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or(
        QrEchoError::InvalidDimensions {
            width: frame.width,
            height: frame.height,
            len: frame.data.len(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> RgbaFrame {
        let mut frame = RgbaFrame::filled(5, 3, [200, 100, 50, 255]).unwrap();
        frame.set_pixel(4, 2, [1, 2, 3, 128]);
        frame
    }

    #[test]
    fn png_bytes_decode_back_to_same_pixels() {
        let frame = sample_frame();
        let png = to_png_bytes(&frame).unwrap();
        assert_eq!(from_bytes(&png).unwrap(), frame);
    }

    #[test]
    fn garbage_bytes_are_a_load_failure() {
        let err = from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, QrEchoError::ImageLoad(_)));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, QrEchoError::ImageLoad(_)));
    }

    #[tokio::test]
    async fn async_load_reads_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = sample_frame();
        save(&frame, &path).unwrap();

        let loaded = load(path).await.unwrap();
        assert_eq!(loaded, frame);
    }

    #[tokio::test]
    async fn async_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("nope.jpg")).await;
        assert!(matches!(result, Err(QrEchoError::ImageLoad(_))));
    }
}
