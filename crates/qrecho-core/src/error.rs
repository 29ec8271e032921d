// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for qrecho.

use thiserror::Error;

/// Top-level error type for all qrecho operations.
#[derive(Debug, Error)]
pub enum QrEchoError {
    // -- Pixel buffer preconditions --
    #[error("invalid dimensions: {width}x{height} does not match a buffer of {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("invalid window size {0}: the neighbourhood must be at least 2 pixels wide")]
    InvalidWindowSize(u32),

    // -- Collaborators --
    #[error("image failed to load: {0}")]
    ImageLoad(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("barcode rendering failed: {0}")]
    Encode(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QrEchoError>;
