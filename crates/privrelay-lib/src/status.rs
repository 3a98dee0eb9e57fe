//! Hardware state bitmaps, the outward status attributes, and the
//! validity gate's tri-state flag.

use std::fmt;

use serde::Serialize;

use crate::protocol::{STATUS_CAMERA, STATUS_MICROPHONE, STATUS_PRIVACY_SCREEN};

// ── Error taxonomy ──

/// Error kinds surfaced through the validity gate and the crate's results.
///
/// A tagged replacement for the raw signed error codes the firmware side
/// speaks: `NotFound` ↔ interface/feature absent, `NotReady` ↔ query
/// before any probe completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Feature or firmware interface absent on this system.
    NotFound,
    /// Firmware call failed or returned the wrong object type.
    Io,
    /// Malformed firmware response buffer.
    InvalidArgument,
    /// Allocation failure during setup.
    OutOfMemory,
    /// Queried before any probe completed.
    NotReady,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Io => "I/O error",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::NotReady => "not ready",
        };
        f.write_str(s)
    }
}

// ── Validity gate ──

/// Cached trust state of the relay, consumed by the audio stack.
///
/// Starts at `NotProbed`; a successful status query moves it to `Valid`,
/// a failed query or instance removal moves it to `Invalid` with the
/// error kind that caused the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// No probe has been attempted yet.
    NotProbed,
    /// Last probe succeeded; relay state is trustworthy.
    Valid,
    /// Last probe failed, or the instance was removed.
    Invalid(ErrorKind),
}

// ── Device state ──

/// Last known firmware-reported state for one hardware instance.
///
/// Both fields share the feature-bit layout from [`crate::protocol`]:
/// `features_present` says which privacy features exist, `last_status`
/// which are currently engaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub features_present: u32,
    pub last_status: u32,
}

impl DeviceState {
    /// Whether the hardware reports a given feature bit as present.
    pub fn supports(&self, feature: u32) -> bool {
        self.features_present & feature != 0
    }

    /// Hardware mic-mute currently engaged.
    pub fn microphone_muted(&self) -> bool {
        self.last_status & STATUS_MICROPHONE != 0
    }

    /// Camera lens cover currently closed.
    pub fn camera_covered(&self) -> bool {
        self.last_status & STATUS_CAMERA != 0
    }

    /// Electronic privacy screen currently on.
    pub fn privacy_screen_on(&self) -> bool {
        self.last_status & STATUS_PRIVACY_SCREEN != 0
    }

    /// The `devices_supported` attribute value: feature bitmap as
    /// lowercase hex, no prefix.
    pub fn devices_supported(&self) -> String {
        format!("{:x}", self.features_present)
    }

    /// The `current_state` attribute value: status bitmap as lowercase
    /// hex, no prefix.
    pub fn current_state(&self) -> String {
        format!("{:x}", self.last_status)
    }
}
