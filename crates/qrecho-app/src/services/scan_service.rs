// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline: load an image, binarize it, hand it to the pattern decoder,
// and re-encode a detected payload as a fresh code.
//
// Pixel work runs on the blocking pool so the async caller never stalls on a
// large photograph. Collaborators sit behind `Arc<dyn ...>` so the service is
// cheap to clone into blocking tasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::GrayImage;
use qrecho_codec::{BarcodeEncoder, PatternDecoder, QrCodeEncoder, RqrrDecoder};
use qrecho_core::EchoConfig;
use qrecho_core::error::{QrEchoError, Result};
use qrecho_core::types::{DecodedSymbol, RgbaFrame, ScanId, ScanOutcome};
use qrecho_imaging::{AdaptiveBinarizer, LuminancePlane, acquire};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Result of one scan, as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub id: ScanId,
    /// The image location as given by the caller.
    pub source: String,
    pub scanned_at: DateTime<Utc>,
    pub outcome: ScanOutcome,
    /// Freshly rendered code for a detected payload.
    #[serde(skip)]
    pub regenerated: Option<GrayImage>,
    /// The binarized image handed to the decoder, when requested.
    #[serde(skip)]
    pub binarized: Option<RgbaFrame>,
}

/// Per-scan switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Re-encode a detected payload.
    pub regenerate: bool,
    /// Keep the binarized frame in the report.
    pub keep_binarized: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            regenerate: true,
            keep_binarized: false,
        }
    }
}

/// Owns the configuration and the decoder/encoder pair.
#[derive(Clone)]
pub struct ScanService {
    config: EchoConfig,
    binarizer: AdaptiveBinarizer,
    decoder: Arc<dyn PatternDecoder>,
    encoder: Arc<dyn BarcodeEncoder>,
}

impl ScanService {
    /// Service with the `rqrr` decoder and `qrcode` encoder.
    pub fn new(config: EchoConfig) -> Result<Self> {
        Self::with_codec(config, Arc::new(RqrrDecoder), Arc::new(QrCodeEncoder))
    }

    pub fn with_codec(
        config: EchoConfig,
        decoder: Arc<dyn PatternDecoder>,
        encoder: Arc<dyn BarcodeEncoder>,
    ) -> Result<Self> {
        config.validate()?;
        let binarizer = AdaptiveBinarizer::new(config.binarizer)?;
        Ok(Self {
            config,
            binarizer,
            decoder,
            encoder,
        })
    }

    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    /// Scan an image file under a fresh id.
    pub async fn scan(&self, source: &str) -> Result<ScanReport> {
        self.scan_as(ScanId::new(), source, ScanOptions::default()).await
    }

    /// Scan an image file under the given id.
    ///
    /// A file that cannot be loaded is reported as `LoadFailed`, and a file
    /// without a readable code as `NotDetected`; neither is an `Err`.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn scan_as(&self, id: ScanId, source: &str, options: ScanOptions) -> Result<ScanReport> {
        let frame = match acquire::load(source).await {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "Image could not be loaded");
                return Ok(self.report(id, source, load_failure(err)));
            }
        };

        let service = self.clone();
        let (detected, binarized) = tokio::task::spawn_blocking(move || service.detect(frame))
            .await
            .map_err(|err| QrEchoError::ImageError(format!("detection task failed: {err}")))??;
        let binarized = options.keep_binarized.then_some(binarized);

        let Some(symbol) = detected else {
            info!("No QR code detected");
            return Ok(ScanReport {
                binarized,
                ..self.report(id, source, ScanOutcome::NotDetected)
            });
        };
        info!(payload_len = symbol.payload.len(), "QR code detected");

        let regenerated = if options.regenerate {
            match self.encoder.encode(&symbol.payload, &self.config.render) {
                Ok(img) => Some(img),
                Err(err) => {
                    warn!(error = %err, "Could not regenerate code");
                    None
                }
            }
        } else {
            None
        };

        Ok(ScanReport {
            regenerated,
            binarized,
            ..self.report(id, source, ScanOutcome::Detected(symbol))
        })
    }

    /// Binarize a frame and decode it, retrying on raw luminance when the
    /// binarized buffer yields nothing and the fallback is enabled.
    ///
    /// Returns the symbol, if any, and the binarized frame. Luminance is
    /// computed once and shared by the binarizer and the fallback.
    pub fn detect(&self, mut frame: RgbaFrame) -> Result<(Option<DecodedSymbol>, RgbaFrame)> {
        let plane = LuminancePlane::from_rgba(&frame.data, frame.width, frame.height)?;
        self.binarizer.binarize_with_plane(&mut frame.data, &plane)?;

        let symbol = self
            .decoder
            .decode_binarized(&frame.data, frame.width, frame.height)?;
        if symbol.is_some() || !self.config.decode_raw_fallback {
            return Ok((symbol, frame));
        }

        info!("Binarized decode found nothing, retrying on raw luminance");
        let symbol = self
            .decoder
            .decode_gray(&plane.to_gray_bytes(), plane.width(), plane.height())?;
        Ok((symbol, frame))
    }

    fn report(&self, id: ScanId, source: &str, outcome: ScanOutcome) -> ScanReport {
        ScanReport {
            id,
            source: source.to_string(),
            scanned_at: Utc::now(),
            outcome,
            regenerated: None,
            binarized: None,
        }
    }
}

fn load_failure(err: QrEchoError) -> ScanOutcome {
    ScanOutcome::LoadFailed {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use qrecho_codec::gray_to_frame;
    use qrecho_core::config::RenderConfig;

    fn write_code(dir: &Path, payload: &str) -> String {
        let render = RenderConfig {
            module_size: 3,
            ..Default::default()
        };
        let img = QrCodeEncoder.encode(payload, &render).unwrap();
        let path = dir.join("code.png");
        acquire::save(&gray_to_frame(&img), &path).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn detects_and_regenerates_payload() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_code(dir.path(), "hello");
        let service = ScanService::new(EchoConfig::default()).unwrap();

        let report = service.scan(&source).await.unwrap();
        assert_eq!(report.source, source);
        assert_eq!(report.outcome.payload(), Some("hello"));

        // The regenerated code decodes to the same payload.
        let regenerated = report.regenerated.expect("code should be regenerated");
        let symbol = RqrrDecoder
            .decode_gray(regenerated.as_raw(), regenerated.width(), regenerated.height())
            .unwrap()
            .unwrap();
        assert_eq!(symbol.payload, "hello");
    }

    #[tokio::test]
    async fn regeneration_can_be_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_code(dir.path(), "skip me");
        let service = ScanService::new(EchoConfig::default()).unwrap();

        let options = ScanOptions {
            regenerate: false,
            ..Default::default()
        };
        let report = service.scan_as(ScanId::new(), &source, options).await.unwrap();
        assert_eq!(report.outcome.payload(), Some("skip me"));
        assert!(report.regenerated.is_none());
        assert!(report.binarized.is_none());
    }

    #[tokio::test]
    async fn blank_image_is_not_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        let frame = RgbaFrame::filled(48, 48, [240, 240, 240, 255]).unwrap();
        acquire::save(&frame, &path).unwrap();

        let service = ScanService::new(EchoConfig::default()).unwrap();
        let report = service.scan(path.to_str().unwrap()).await.unwrap();
        assert_eq!(report.outcome, ScanOutcome::NotDetected);
        assert!(report.regenerated.is_none());
    }

    #[tokio::test]
    async fn unreadable_file_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let service = ScanService::new(EchoConfig::default()).unwrap();
        let report = service.scan(path.to_str().unwrap()).await.unwrap();
        assert!(matches!(report.outcome, ScanOutcome::LoadFailed { .. }));
    }

    #[tokio::test]
    async fn report_keeps_requested_id() {
        let service = ScanService::new(EchoConfig::default()).unwrap();
        let id = ScanId::new();
        let options = ScanOptions {
            keep_binarized: true,
            ..Default::default()
        };
        let report = service.scan_as(id, "/no/such/image.png", options).await.unwrap();
        assert_eq!(report.id, id);
        assert!(matches!(report.outcome, ScanOutcome::LoadFailed { .. }));
        assert!(report.binarized.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EchoConfig::default();
        config.binarizer.window_size = 0;
        assert!(ScanService::new(config).is_err());
    }

    #[test]
    fn raw_fallback_runs_only_when_enabled() {
        /// Finds nothing in binarized buffers; on grayscale, reports the first
        /// gray level it was given.
        struct GrayOnly;
        impl PatternDecoder for GrayOnly {
            fn decode_binarized(&self, _: &[u8], _: u32, _: u32) -> Result<Option<DecodedSymbol>> {
                Ok(None)
            }
            fn decode_gray(&self, gray: &[u8], _: u32, _: u32) -> Result<Option<DecodedSymbol>> {
                Ok(Some(DecodedSymbol::new(gray[0].to_string())))
            }
        }

        let frame = RgbaFrame::filled(4, 4, [9, 9, 9, 255]).unwrap();

        let service = ScanService::with_codec(
            EchoConfig::default(),
            Arc::new(GrayOnly),
            Arc::new(QrCodeEncoder),
        )
        .unwrap();
        let (found, binarized) = service.detect(frame.clone()).unwrap();
        // The fallback sees the original gray level, not the binarized 255.
        assert_eq!(found.map(|s| s.payload).as_deref(), Some("9"));
        assert_eq!(binarized.pixel(0, 0), [255, 255, 255, 255]);

        let config = EchoConfig {
            decode_raw_fallback: false,
            ..Default::default()
        };
        let service =
            ScanService::with_codec(config, Arc::new(GrayOnly), Arc::new(QrCodeEncoder)).unwrap();
        assert!(service.detect(frame).unwrap().0.is_none());
    }

    #[tokio::test]
    async fn binarized_frame_is_kept_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_code(dir.path(), "keep");
        let service = ScanService::new(EchoConfig::default()).unwrap();
        let options = ScanOptions {
            keep_binarized: true,
            ..Default::default()
        };

        let report = service.scan_as(ScanId::new(), &source, options).await.unwrap();
        assert_eq!(report.outcome.payload(), Some("keep"));
        let frame = report.binarized.expect("binarized frame should be kept");
        assert!(
            frame
                .data
                .chunks_exact(4)
                .all(|px| (px[0] == 0 || px[0] == 255) && px[0] == px[1] && px[1] == px[2])
        );

        let report = service.scan(&source).await.unwrap();
        assert!(report.binarized.is_none());
    }
}
