//! Firmware interface constants for the privacy-notification facility.
//!
//! The firmware exposes a single notification GUID plus a synchronous
//! "device state" block query. Events arrive as `(type, code, status)`
//! triples; the input-layer scancode for an event is the event type and
//! code packed into one `u32` (see [`composite_scancode`]).

// ── Firmware discovery ──

/// GUID of the firmware privacy-notification interface.
///
/// Presence of this GUID is the system-level "does this machine have the
/// facility at all" check — absent GUID means the validity gate reports
/// `NotFound` unconditionally.
pub const PRIVACY_GUID: &str = "6932965F-1671-4CEB-B988-D3AB0A901919";

// ── Feature bits ──
//
// Shared layout between `features_present` (capability) and `last_status`
// (current on/off state): bit N set in the status bitmap means feature N
// is currently engaged (mic muted, lens covered, privacy screen on).

/// Microphone hardware mute.
pub const STATUS_MICROPHONE: u32 = 1 << 0;

/// Camera shutter / lens cover.
pub const STATUS_CAMERA: u32 = 1 << 1;

/// Electronic privacy screen.
pub const STATUS_PRIVACY_SCREEN: u32 = 1 << 2;

// ── Event namespace ──

/// Event-type namespace for privacy events. Scancodes are prefixed with
/// this value so they cannot collide with unrelated event sources sharing
/// the same input device.
pub const EVENT_TYPE_PRIVACY: u16 = 0x0012;

/// Event code for the microphone-mute key event.
pub const CODE_AUDIO: u16 = 0x0001;

/// Event code for the camera lens-cover switch event.
pub const CODE_CAMERA: u16 = 0x0002;

/// Pack an event `(type, code)` pair into the composite input scancode.
///
/// The mic-mute key under the privacy namespace is therefore reported as
/// scancode `0x0012_0001`.
pub const fn composite_scancode(event_type: u16, code: u16) -> u32 {
    ((event_type as u32) << 16) | code as u32
}

// ── State block query ──

/// Expected length of the synchronous device-state response:
/// `[features_present: u32 LE][current_state: u32 LE]`.
pub const STATE_BLOCK_LEN: usize = 8;

// ── Embedded controller ──

/// Name of the no-argument EC method acknowledging a software mute.
///
/// The mute key starts a time-delayed hardware mute circuit; the ack lets
/// software mute first so the hardware cutoff produces no audible pop.
pub const EC_ACK_METHOD: &str = "ECAK";

// ── Indicator registration ──

/// LED class-device name for the mic-mute indicator.
pub const MICMUTE_LED_NAME: &str = "privacy::micmute";

/// Default LED trigger tied to the audio stack's mute state.
pub const MICMUTE_LED_TRIGGER: &str = "audio-micmute";

/// Name of the virtual input device the relay registers.
pub const INPUT_DEVICE_NAME: &str = "Privacy Relay";
