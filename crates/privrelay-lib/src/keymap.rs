//! Keymap table — composite scancode to input-action mapping.
//!
//! Built once at relay construction with a fixed event-type namespace,
//! read-only afterward. The namespace prefix keeps privacy scancodes out
//! of the way of unrelated event sources sharing the input device.

use crate::input::InputAction;
use crate::protocol::{CODE_AUDIO, CODE_CAMERA, composite_scancode};

/// One immutable scancode → action mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeymapEntry {
    /// Namespace-prefixed composite scancode.
    pub scancode: u32,
    /// The event code within the namespace (low 16 bits of `scancode`).
    pub code: u16,
    /// The abstract action this scancode maps to.
    pub action: InputAction,
}

/// The full table for one event-type namespace.
#[derive(Debug)]
pub struct KeymapTable {
    namespace: u16,
    entries: Vec<KeymapEntry>,
}

impl KeymapTable {
    /// Build the table with every code prefixed by `namespace`.
    ///
    /// Two entries: the mic-mute key and the camera lens-cover switch.
    /// With namespace `0x0012` the mic-mute key is reported as scancode
    /// `0x0012_0001`.
    pub fn new(namespace: u16) -> Self {
        let entries = vec![
            KeymapEntry {
                scancode: composite_scancode(namespace, CODE_AUDIO),
                code: CODE_AUDIO,
                action: InputAction::MicMuteKey,
            },
            KeymapEntry {
                scancode: composite_scancode(namespace, CODE_CAMERA),
                code: CODE_CAMERA,
                action: InputAction::CameraLensCoverSwitch,
            },
        ];
        KeymapTable { namespace, entries }
    }

    /// The event-type namespace the table was built for.
    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    /// Look up an entry by its composite scancode.
    pub fn lookup(&self, scancode: u32) -> Option<&KeymapEntry> {
        self.entries.iter().find(|e| e.scancode == scancode)
    }

    /// All entries, in table order.
    pub fn entries(&self) -> &[KeymapEntry] {
        &self.entries
    }
}
