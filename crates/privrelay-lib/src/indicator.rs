//! Mic-mute LED indicator — EC acknowledgment on the "on" transition.
//!
//! Pressing the mute key starts a time-delayed circuit that physically
//! cuts the microphone; the LED sits in the same circuit and reflects the
//! true hardware state. The EC ack exists so software can soft-mute
//! before the cutoff completes — without it the delayed mute still
//! happens, but with an audible pop. Exposing the ack as a brightness-1
//! LED lets the audio stack's mute-trigger path drive it.

use crate::firmware::{FirmwareInterface, Result};
use crate::protocol::{MICMUTE_LED_NAME, MICMUTE_LED_TRIGGER};

/// Registration description for the indicator LED class device.
///
/// The host registers the LED with these values; brightness writes come
/// back through [`MicMuteLed::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub name: &'static str,
    /// Binary indicator: 0 or 1, no intermediate levels.
    pub max_brightness: u8,
    /// Default trigger tying the LED to the audio stack's mute state.
    pub default_trigger: &'static str,
    /// Brightness at registration, read from the audio-mute trigger state.
    pub initial_brightness: u8,
}

impl IndicatorConfig {
    /// Build the registration record, seeding the initial brightness from
    /// the audio stack's current mute state.
    pub fn new(audio_muted: bool) -> Self {
        IndicatorConfig {
            name: MICMUTE_LED_NAME,
            max_brightness: 1,
            default_trigger: MICMUTE_LED_TRIGGER,
            initial_brightness: u8::from(audio_muted),
        }
    }
}

/// The mic-mute indicator itself. Stateless — the status store stays
/// authoritative and is updated only by the event relay.
#[derive(Debug, Default)]
pub struct MicMuteLed;

impl MicMuteLed {
    pub fn new() -> Self {
        MicMuteLed
    }

    /// Handle a brightness write from the LED subsystem.
    ///
    /// Only the `on` transition acknowledges to the EC (exactly one call);
    /// turning the indicator off never touches the firmware. EC handle or
    /// method absence surfaces as an I/O error from the firmware seam.
    pub fn set(&self, fw: &impl FirmwareInterface, on: bool) -> Result<()> {
        if !on {
            return Ok(());
        }
        fw.ec_ack()?;
        log::debug!("privacy micmute EC ack sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::mock::MockFirmware;

    #[test]
    fn on_transition_acks_once() {
        let fw = MockFirmware::new();
        let led = MicMuteLed::new();
        led.set(&fw, true).unwrap();
        assert_eq!(fw.ec_acks.get(), 1);
    }

    #[test]
    fn off_transition_never_acks() {
        let fw = MockFirmware::new();
        let led = MicMuteLed::new();
        led.set(&fw, false).unwrap();
        assert_eq!(fw.ec_acks.get(), 0);
    }

    #[test]
    fn missing_ec_handle_surfaces_error() {
        let fw = MockFirmware::new();
        fw.fail_ec_ack.set(true);
        let led = MicMuteLed::new();
        assert!(led.set(&fw, true).is_err());
        // Off still succeeds — it makes no firmware call at all.
        assert!(led.set(&fw, false).is_ok());
    }

    #[test]
    fn repeated_on_writes_ack_each_time() {
        let fw = MockFirmware::new();
        let led = MicMuteLed::new();
        led.set(&fw, true).unwrap();
        led.set(&fw, true).unwrap();
        assert_eq!(fw.ec_acks.get(), 2);
    }

    #[test]
    fn registration_record_shape() {
        let cfg = IndicatorConfig::new(false);
        assert_eq!(cfg.name, "privacy::micmute");
        assert_eq!(cfg.max_brightness, 1);
        assert_eq!(cfg.default_trigger, "audio-micmute");
        assert_eq!(cfg.initial_brightness, 0);

        let cfg = IndicatorConfig::new(true);
        assert_eq!(cfg.initial_brightness, 1);
    }
}
