// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scan results and errors.
//
// Every technical error is mapped to a plain sentence with a suggestion. The
// terminal scan states ("no code detected" versus "image failed to load") are
// kept distinct so the user knows whether to try another image or another file.

use crate::error::QrEchoError;
use crate::types::ScanOutcome;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it (wrong path, bad flag).
    ActionRequired,
    /// Retrying with the same input will not help.
    Permanent,
    /// A bug or an environment problem; worth reporting.
    Internal,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `QrEchoError` into a `HumanError`.
pub fn humanize_error(err: &QrEchoError) -> HumanError {
    match err {
        QrEchoError::InvalidDimensions { width, height, len } => HumanError {
            message: "The image data is inconsistent.".into(),
            suggestion: match (*width as u64)
                .checked_mul(*height as u64)
                .and_then(|pixels| pixels.checked_mul(4))
            {
                Some(expected) => format!(
                    "A {width}x{height} image needs {expected} bytes of RGBA data but {len} were supplied."
                ),
                None => format!(
                    "A {width}x{height} image is too large to hold in memory ({len} bytes were supplied)."
                ),
            },
            severity: Severity::Internal,
        },

        QrEchoError::InvalidWindowSize(size) => HumanError {
            message: "The threshold window is too small.".into(),
            suggestion: format!("Use a window of at least 2 pixels (got {size}); 11 works well for most photos."),
            severity: Severity::ActionRequired,
        },

        QrEchoError::ImageLoad(_) => HumanError {
            message: "Image failed to load, cannot detect QR code.".into(),
            suggestion: "Check the file exists and is a PNG, JPEG, GIF, BMP or WebP image.".into(),
            severity: Severity::ActionRequired,
        },

        QrEchoError::ImageError(_) => HumanError {
            message: "There was a problem processing the image.".into(),
            suggestion: "Try saving the image as PNG first.".into(),
            severity: Severity::Permanent,
        },

        QrEchoError::Encode(_) => HumanError {
            message: "A new QR code could not be generated.".into(),
            suggestion: "The payload may be too long for a QR code; try a lower error-correction level.".into(),
            severity: Severity::Permanent,
        },

        QrEchoError::Config(detail) => HumanError {
            message: "The configuration is not valid.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        QrEchoError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied.".into(),
                    suggestion: "Check the file permissions or choose another output location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again; the disk may be full.".into(),
                    severity: Severity::Internal,
                }
            }
        }

        QrEchoError::Serialization(_) => HumanError {
            message: "The configuration file could not be read.".into(),
            suggestion: "Delete or fix the JSON config file; defaults will be used.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

/// The status line shown to the user for a finished scan.
pub fn describe_outcome(outcome: &ScanOutcome) -> &'static str {
    match outcome {
        ScanOutcome::Detected(_) => "QR code detected:",
        ScanOutcome::NotDetected => "No QR code detected",
        ScanOutcome::LoadFailed { .. } => "Image failed to load, cannot detect QR code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecodedSymbol;

    #[test]
    fn load_failure_is_distinct_from_not_detected() {
        let failed = ScanOutcome::LoadFailed {
            reason: "404".into(),
        };
        assert_ne!(describe_outcome(&failed), describe_outcome(&ScanOutcome::NotDetected));
        assert_eq!(
            describe_outcome(&ScanOutcome::Detected(DecodedSymbol::new("x"))),
            "QR code detected:"
        );
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = QrEchoError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn dimension_mismatch_reports_expected_length() {
        let err = QrEchoError::InvalidDimensions {
            width: 2,
            height: 2,
            len: 3,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Internal);
        assert!(human.suggestion.contains("16 bytes"));
    }

    #[test]
    fn unaddressable_dimensions_are_described_without_overflow() {
        let err = QrEchoError::InvalidDimensions {
            width: u32::MAX,
            height: u32::MAX,
            len: 16,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Internal);
        assert!(human.suggestion.contains("too large"));
        assert!(human.suggestion.contains("16 bytes"));
    }

    #[test]
    fn encode_failure_is_permanent() {
        let human = humanize_error(&QrEchoError::Encode("data too long".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}
