// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line contract: settings overrides, exit statuses and the optional
// binarized-image dump.

use std::path::Path;

use qrecho_core::EchoConfig;
use qrecho_core::error::Result;
use qrecho_core::types::ScanOutcome;
use qrecho_imaging::acquire;
use tracing::info;

use crate::services::config_dir::{load_config, persist_config};
use crate::services::scan_service::ScanReport;

/// Exit status for a detected code.
pub const EXIT_DETECTED: u8 = 0;
/// Exit status when the image loaded but held no readable code.
pub const EXIT_NOT_DETECTED: u8 = 1;
/// Exit status for a load failure or any other error.
pub const EXIT_FAILED: u8 = 2;

/// Settings given on the command line, layered over the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub window: Option<u32>,
    pub parallel: bool,
}

impl SettingsOverrides {
    pub fn apply(&self, config: &mut EchoConfig) {
        if let Some(window) = self.window {
            config.binarizer.window_size = window;
        }
        if self.parallel {
            config.binarizer.parallel = true;
        }
    }
}

/// Load settings from `path`, apply the overrides, and validate the result.
/// With `save`, the effective settings are written back to `path`.
pub fn resolve_settings(path: &Path, overrides: &SettingsOverrides, save: bool) -> Result<EchoConfig> {
    let mut config = load_config(path)?;
    overrides.apply(&mut config);
    config.validate()?;
    if save {
        persist_config(path, &config)?;
    }
    Ok(config)
}

/// Process exit status for a finished run.
pub fn exit_status(result: &Result<ScanOutcome>) -> u8 {
    match result {
        Ok(ScanOutcome::Detected(_)) => EXIT_DETECTED,
        Ok(ScanOutcome::NotDetected) => EXIT_NOT_DETECTED,
        Ok(ScanOutcome::LoadFailed { .. }) | Err(_) => EXIT_FAILED,
    }
}

/// Write the report's binarized frame to `path`. Returns `false`, writing
/// nothing, when the report has none (the image never loaded).
pub fn write_binarized(report: &ScanReport, path: &Path) -> Result<bool> {
    let Some(frame) = &report.binarized else {
        return Ok(false);
    };
    acquire::save(frame, path)?;
    info!(path = %path.display(), "Binarized image written");
    Ok(true)
}
