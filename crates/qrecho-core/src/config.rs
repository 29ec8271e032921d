// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{QrEchoError, Result};
use crate::types::EcLevel;

/// Default neighbourhood side length for the adaptive binarizer.
pub const DEFAULT_WINDOW_SIZE: u32 = 11;

/// Settings for the adaptive binarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizerConfig {
    /// Side length of the square neighbourhood used for the local mean.
    /// The half-extent is `window_size / 2`, truncated.
    pub window_size: u32,
    /// Classify rows on the rayon thread pool.
    pub parallel: bool,
}

impl BinarizerConfig {
    /// Half-extent of the window in each direction.
    pub fn half_extent(&self) -> u32 {
        self.window_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(QrEchoError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

impl Default for BinarizerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            parallel: false,
        }
    }
}

/// Settings for rendering the regenerated barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per module.
    pub module_size: u32,
    /// Surround the symbol with the standard 4-module light border.
    pub quiet_zone: bool,
    /// Error-correction level of the regenerated code.
    pub ec_level: EcLevel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_size: 8,
            quiet_zone: true,
            ec_level: EcLevel::Medium,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    pub binarizer: BinarizerConfig,
    pub render: RenderConfig,
    /// File name used when the regenerated code is downloaded.
    pub output_file: String,
    /// Retry the decoder on the raw luminance when the binarized buffer
    /// yields nothing.
    pub decode_raw_fallback: bool,
}

impl EchoConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.binarizer.validate()?;
        if self.render.module_size == 0 {
            return Err(QrEchoError::Config("module size must be at least 1 pixel".into()));
        }
        if self.output_file.trim().is_empty() {
            return Err(QrEchoError::Config("output file name is empty".into()));
        }
        Ok(())
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            binarizer: BinarizerConfig::default(),
            render: RenderConfig::default(),
            output_file: "qrcode.png".into(),
            decode_raw_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_eleven_with_half_extent_five() {
        let cfg = BinarizerConfig::default();
        assert_eq!(cfg.window_size, 11);
        assert_eq!(cfg.half_extent(), 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn tiny_window_is_rejected() {
        for window_size in [0, 1] {
            let cfg = BinarizerConfig {
                window_size,
                ..Default::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(QrEchoError::InvalidWindowSize(w)) if w == window_size
            ));
        }
    }

    #[test]
    fn zero_module_size_is_rejected() {
        let mut cfg = EchoConfig::default();
        cfg.render.module_size = 0;
        assert!(matches!(cfg.validate(), Err(QrEchoError::Config(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EchoConfig =
            serde_json::from_str(r#"{ "binarizer": { "window_size": 15 } }"#).unwrap();
        assert_eq!(cfg.binarizer.window_size, 15);
        assert!(!cfg.binarizer.parallel);
        assert_eq!(cfg.output_file, "qrcode.png");
        assert_eq!(cfg.render, RenderConfig::default());
    }
}
