// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Popup state: which pointer gestures open a scan, and the lifecycle of the
// single result popup (pending, populated, closed).

use chrono::{DateTime, Utc};
use image::GrayImage;
use qrecho_codec::to_png_bytes;
use qrecho_core::error::Result;
use qrecho_core::human_errors::describe_outcome;
use qrecho_core::types::{ScanId, ScanOutcome};
use tracing::{debug, info};

/// Keys the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Control,
    Other,
}

/// Tracks whether the Ctrl modifier is currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    ctrl: bool,
}

impl ModifierState {
    pub fn key_down(&mut self, key: Key) {
        if key == Key::Control {
            self.ctrl = true;
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Control {
            self.ctrl = false;
        }
    }

    pub fn ctrl_held(&self) -> bool {
        self.ctrl
    }
}

/// Mouse button of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// What happened with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Click,
    ContextMenu,
}

/// Element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// An image, with its source location.
    Image { source: String },
    /// Anything inside the open popup.
    Popup,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub button: PointerButton,
    pub target: PointerTarget,
}

/// Decision for a pointer event, before the popup reacts to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Open a scan of this image; the host's default handling is suppressed.
    Scan { source: String },
    /// Swallow the native context menu.
    SuppressContextMenu,
    /// Not ours; let the host handle it.
    PassThrough,
}

/// Maps pointer gestures to scan triggers.
///
/// With Ctrl held over an image, a secondary-button press or a click opens a
/// scan and the context menu is suppressed. Everything else passes through.
pub struct PointerTrigger;

impl PointerTrigger {
    pub fn evaluate(modifiers: &ModifierState, event: &PointerEvent) -> Trigger {
        let PointerTarget::Image { source } = &event.target else {
            return Trigger::PassThrough;
        };
        if !modifiers.ctrl_held() {
            return Trigger::PassThrough;
        }
        match (event.action, event.button) {
            (PointerAction::Press, PointerButton::Secondary) | (PointerAction::Click, _) => {
                Trigger::Scan {
                    source: source.clone(),
                }
            }
            (PointerAction::ContextMenu, _) => Trigger::SuppressContextMenu,
            _ => Trigger::PassThrough,
        }
    }
}

/// Progress of the open popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupPhase {
    /// Detection is running.
    Pending,
    /// Detection finished with this outcome.
    Populated(ScanOutcome),
}

/// One open popup.
#[derive(Debug, Clone)]
pub struct PopupSession {
    pub id: ScanId,
    pub source: String,
    pub opened_at: DateTime<Utc>,
    pub phase: PopupPhase,
    /// Regenerated code offered for download.
    pub regenerated: Option<GrayImage>,
}

impl PopupSession {
    /// Text shown under the source location.
    pub fn status_line(&self) -> &'static str {
        match &self.phase {
            PopupPhase::Pending => "Detecting QR code...",
            PopupPhase::Populated(outcome) => describe_outcome(outcome),
        }
    }

    /// The decoded payload, once detection succeeded.
    pub fn payload(&self) -> Option<&str> {
        match &self.phase {
            PopupPhase::Populated(outcome) => outcome.payload(),
            PopupPhase::Pending => None,
        }
    }
}

/// A file offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Owns the at-most-one popup.
#[derive(Debug)]
pub struct PopupController {
    session: Option<PopupSession>,
    download_name: String,
}

impl PopupController {
    pub fn new(download_name: impl Into<String>) -> Self {
        Self {
            session: None,
            download_name: download_name.into(),
        }
    }

    pub fn session(&self) -> Option<&PopupSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Route a pointer event. Returns the id of a newly opened scan.
    pub fn handle_pointer(&mut self, modifiers: &ModifierState, event: &PointerEvent) -> Option<ScanId> {
        match PointerTrigger::evaluate(modifiers, event) {
            Trigger::Scan { source } => Some(self.open(source)),
            Trigger::SuppressContextMenu => None,
            Trigger::PassThrough => {
                if event.action == PointerAction::Click && event.target != PointerTarget::Popup {
                    self.on_outside_click();
                }
                None
            }
        }
    }

    /// Open a popup for `source`, replacing any popup already open.
    pub fn open(&mut self, source: impl Into<String>) -> ScanId {
        if let Some(previous) = self.session.take() {
            debug!(id = %previous.id, "Replacing open popup");
        }
        let session = PopupSession {
            id: ScanId::new(),
            source: source.into(),
            opened_at: Utc::now(),
            phase: PopupPhase::Pending,
            regenerated: None,
        };
        let id = session.id;
        info!(id = %id, source = %session.source, "Popup opened");
        self.session = Some(session);
        id
    }

    /// Fill the popup with a finished scan. Results for a popup that has since
    /// been closed or replaced are dropped; returns whether it was applied.
    pub fn populate(&mut self, id: ScanId, outcome: ScanOutcome, regenerated: Option<GrayImage>) -> bool {
        match self.session.as_mut() {
            Some(session) if session.id == id => {
                session.phase = PopupPhase::Populated(outcome);
                session.regenerated = regenerated;
                true
            }
            _ => {
                debug!(id = %id, "Dropping result for stale popup");
                false
            }
        }
    }

    /// Close the popup. Returns whether one was open.
    pub fn close(&mut self) -> bool {
        self.session.take().is_some()
    }

    pub fn on_outside_click(&mut self) {
        if self.close() {
            debug!("Popup closed by outside click");
        }
    }

    /// Text to copy for the image source; closes the popup.
    pub fn copy_source(&mut self) -> Option<String> {
        self.session.take().map(|session| session.source)
    }

    /// Text to copy for the decoded payload; closes the popup. Does nothing
    /// until a payload is shown.
    pub fn copy_payload(&mut self) -> Option<String> {
        let payload = self.session.as_ref()?.payload()?.to_string();
        self.session = None;
        Some(payload)
    }

    /// The regenerated code as a PNG download. The popup stays open.
    pub fn download(&self) -> Result<Option<Download>> {
        let Some(img) = self.session.as_ref().and_then(|s| s.regenerated.as_ref()) else {
            return Ok(None);
        };
        Ok(Some(Download {
            file_name: self.download_name.clone(),
            bytes: to_png_bytes(img)?,
        }))
    }
}
