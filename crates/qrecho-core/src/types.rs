// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for qrecho: pixel buffers, decoded symbols and scan outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QrEchoError, Result};

/// Bytes per pixel in an RGBA buffer.
pub const CHANNELS: usize = 4;

/// Unique identifier for one scan (one opened popup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width and height of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels, or `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Byte length of an RGBA buffer of this size, or `None` when it cannot
    /// be addressed (overflow or more than `isize::MAX` bytes).
    pub fn rgba_len(&self) -> Option<usize> {
        self.pixel_count()
            .and_then(|count| count.checked_mul(CHANNELS))
            .filter(|&len| len <= isize::MAX as usize)
    }

    /// Check the `len == width * height * 4` invariant of an RGBA buffer.
    pub fn validate_rgba(&self, len: usize) -> Result<()> {
        match self.rgba_len() {
            Some(expected) if self.width > 0 && self.height > 0 && expected == len => Ok(()),
            _ => Err(QrEchoError::InvalidDimensions {
                width: self.width,
                height: self.height,
                len,
            }),
        }
    }
}

/// An owned RGBA8 pixel buffer, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Wrap an existing buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Dimensions::new(width, height).validate_rgba(data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single RGBA colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let dims = Dimensions::new(width, height);
        let len = dims.rgba_len().ok_or(QrEchoError::InvalidDimensions {
            width,
            height,
            len: 0,
        })?;
        if len == 0 {
            return Err(QrEchoError::InvalidDimensions { width, height, len });
        }
        Self::new(width, height, rgba.repeat(len / CHANNELS))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Overwrite the RGBA value at `(x, y)`. Panics when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }
}

/// QR error-correction level used when rendering a regenerated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    /// ~7% recovery.
    Low,
    /// ~15% recovery.
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery.
    High,
}

impl EcLevel {
    /// Map the two error-correction bits of a QR format word
    /// (`00` = M, `01` = L, `10` = H, `11` = Q).
    pub fn from_format_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Self::Medium),
            1 => Some(Self::Low),
            2 => Some(Self::High),
            3 => Some(Self::Quartile),
            _ => None,
        }
    }
}

/// A symbol recovered by the pattern decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSymbol {
    /// The decoded payload string.
    pub payload: String,
    /// Symbol version (1..=40 for QR), when the decoder reports it.
    pub version: Option<usize>,
    /// Error-correction level, when the decoder reports it.
    pub ec_level: Option<EcLevel>,
}

impl DecodedSymbol {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            version: None,
            ec_level: None,
        }
    }
}

/// Terminal state of a scan, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A symbol was found and decoded.
    Detected(DecodedSymbol),
    /// The image loaded but no symbol could be decoded.
    NotDetected,
    /// The image could not be loaded, so detection never ran.
    LoadFailed { reason: String },
}

impl ScanOutcome {
    /// The decoded payload, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Detected(symbol) => Some(&symbol.payload),
            _ => None,
        }
    }
}
