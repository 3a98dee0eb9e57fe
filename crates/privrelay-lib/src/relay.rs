//! Event relay — firmware notifications in, input events out.
//!
//! [`RelayContext`] owns the registration list, the cached validity flag,
//! and the keymap table. The host drives the lifecycle (`open`/`close`)
//! and forwards firmware `(type, code, status)` triples to
//! [`RelayContext::process_event`]; the audio stack consults
//! [`RelayContext::query_validity`] before trusting any of it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::firmware::{FirmwareError, FirmwareInterface};
use crate::input::InputSink;
use crate::keymap::KeymapTable;
use crate::protocol::{
    CODE_AUDIO, CODE_CAMERA, EVENT_TYPE_PRIVACY, STATE_BLOCK_LEN, composite_scancode,
};
use crate::status::{DeviceState, ErrorKind, Validity};

/// One registered firmware-exposed hardware device.
#[derive(Debug, Clone, Copy)]
pub struct HardwareInstance {
    /// Last known feature/state bitmaps, populated by the initial probe
    /// and updated by the relay on each recognized event.
    pub state: DeviceState,
}

/// Mutable relay state behind the single context lock.
#[derive(Debug)]
struct RelayShared {
    /// Registered instances in registration order.
    instances: Vec<HardwareInstance>,
    validity: Validity,
}

/// The privacy-notification relay.
///
/// Registrations are tracked in order but only the first instance is ever
/// consulted — the facility is single-instance by design; a second `open`
/// while one instance is registered is tracked but inert until the head
/// of the list is closed.
///
/// All reads and writes of the instance list and its bitmaps happen under
/// one mutex, held only around list traversal and field mutation — never
/// across firmware I/O (the probe runs before list insertion) or input
/// emission.
#[derive(Debug)]
pub struct RelayContext {
    keymap: KeymapTable,
    interface_present: bool,
    shared: Mutex<RelayShared>,
}

impl RelayContext {
    /// Create a context for the given firmware, keymap namespace
    /// [`EVENT_TYPE_PRIVACY`]. No I/O beyond the presence check.
    pub fn new(fw: &impl FirmwareInterface) -> Self {
        Self::with_namespace(fw, EVENT_TYPE_PRIVACY)
    }

    /// Create a context with a custom keymap namespace.
    pub fn with_namespace(fw: &impl FirmwareInterface, namespace: u16) -> Self {
        RelayContext {
            keymap: KeymapTable::new(namespace),
            interface_present: fw.interface_present(),
            shared: Mutex::new(RelayShared {
                instances: Vec::new(),
                validity: Validity::NotProbed,
            }),
        }
    }

    fn shared(&self) -> MutexGuard<'_, RelayShared> {
        // A panic while holding the lock cannot leave the bitmaps
        // half-written (all writes are single stores), so a poisoned
        // guard is still safe to use.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Lifecycle ──

    /// Register a hardware instance: probe, then insert.
    ///
    /// Issues the synchronous status query **before** touching the list so
    /// no firmware I/O runs under the lock. On success the instance joins
    /// the registration list and the validity gate turns `Valid`; on any
    /// failure the gate is forced `Invalid` with the error's kind, no
    /// partial state is retained, and the error is surfaced.
    pub fn open(&self, fw: &impl FirmwareInterface) -> Result<(), FirmwareError> {
        match query_current_status(fw) {
            Ok(state) => {
                let mut shared = self.shared();
                shared.instances.push(HardwareInstance { state });
                shared.validity = Validity::Valid;
                log::debug!(
                    "registered privacy instance (features {:#x}, state {:#x})",
                    state.features_present,
                    state.last_status
                );
                Ok(())
            }
            Err(e) => {
                log::error!("privacy instance registration failed: {e}");
                self.shared().validity = Validity::Invalid(e.kind());
                Err(e)
            }
        }
    }

    /// Remove the active (first-registered) instance.
    ///
    /// The validity gate turns `Invalid(NotFound)` on any removal.
    pub fn close(&self) {
        let mut shared = self.shared();
        if !shared.instances.is_empty() {
            shared.instances.remove(0);
        }
        shared.validity = Validity::Invalid(ErrorKind::NotFound);
    }

    // ── Event relay ──

    /// Relay one firmware notification.
    ///
    /// Fire-and-forget: every failure path logs and drops the event (the
    /// notification channel has no return path). A recognized audio or
    /// camera event updates `last_status` on the first registered
    /// instance and emits exactly one input action, reported active with
    /// auto-release per the action type.
    pub fn process_event(
        &self,
        sink: &impl InputSink,
        event_type: u16,
        code: u16,
        status: u32,
    ) {
        let scancode = composite_scancode(event_type, code);
        let action = {
            let mut shared = self.shared();
            let Some(instance) = shared.instances.first_mut() else {
                log::error!("privacy event dropped: no hardware instance registered");
                return;
            };
            let Some(entry) = self.keymap.lookup(scancode) else {
                log::debug!(
                    "unknown key with type {event_type:#06x} and code {code:#06x} pressed"
                );
                return;
            };
            match code {
                CODE_AUDIO | CODE_CAMERA => {
                    instance.state.last_status = status;
                    entry.action
                }
                _ => {
                    log::debug!("unknown event type {event_type:#06x} {code:#06x}");
                    return;
                }
            }
        };
        // Lock released; emission must not extend the critical section.
        if let Err(e) = sink.report(action, true) {
            log::warn!("input emission failed: {e}");
        }
    }

    // ── Validity gate ──

    /// Cached trust query for the audio stack. Never performs I/O.
    ///
    /// `NotFound` when the firmware interface is absent on this system,
    /// `NotReady` before any probe, `Ok` after a successful probe, and
    /// the stored kind after a failed probe or removal.
    pub fn query_validity(&self) -> Result<(), ErrorKind> {
        if !self.interface_present {
            return Err(ErrorKind::NotFound);
        }
        match self.shared().validity {
            Validity::NotProbed => Err(ErrorKind::NotReady),
            Validity::Valid => Ok(()),
            Validity::Invalid(kind) => Err(kind),
        }
    }

    /// Raw cached validity value (attribute/debug surface).
    pub fn validity(&self) -> Validity {
        self.shared().validity
    }

    // ── Status attributes ──

    /// Snapshot of the active instance's state, if one is registered.
    pub fn device_state(&self) -> Option<DeviceState> {
        self.shared().instances.first().map(|i| i.state)
    }

    /// The read-only `devices_supported` attribute (hex text).
    pub fn devices_supported(&self) -> Option<String> {
        self.device_state().map(|s| s.devices_supported())
    }

    /// The read-only `current_state` attribute (hex text).
    pub fn current_state(&self) -> Option<String> {
        self.device_state().map(|s| s.current_state())
    }

    /// Number of registered instances (only the first is consulted).
    pub fn instance_count(&self) -> usize {
        self.shared().instances.len()
    }

    /// The keymap table the relay was built with.
    pub fn keymap(&self) -> &KeymapTable {
        &self.keymap
    }
}

/// The initial synchronous probe: query and decode the 8-byte state block.
///
/// Runs exactly once per registration, from [`RelayContext::open`].
/// Errors: interface absent → `NotFound`, call failure or non-buffer
/// response → `Io`, length ≠ 8 → `BadLength` (invalid argument).
pub fn query_current_status(fw: &impl FirmwareInterface) -> Result<DeviceState, FirmwareError> {
    if !fw.interface_present() {
        return Err(FirmwareError::NotFound);
    }
    let block = fw.query_device_state()?;
    if block.len() != STATE_BLOCK_LEN {
        return Err(FirmwareError::BadLength(block.len()));
    }
    Ok(DeviceState {
        features_present: u32::from_le_bytes(block[..4].try_into().unwrap_or_default()),
        last_status: u32::from_le_bytes(block[4..8].try_into().unwrap_or_default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::mock::MockFirmware;
    use crate::input::mock::MockSink;
    use crate::input::InputAction;

    fn open_relay(features: u32, status: u32) -> (RelayContext, MockFirmware) {
        let fw = MockFirmware::with_state(features, status);
        let relay = RelayContext::new(&fw);
        relay.open(&fw).unwrap();
        (relay, fw)
    }

    // ── query_current_status ──

    #[test]
    fn probe_decodes_state_block() {
        let fw = MockFirmware::with_state(0x3, 0x1);
        let state = query_current_status(&fw).unwrap();
        assert_eq!(state.features_present, 0x3);
        assert_eq!(state.last_status, 0x1);
    }

    #[test]
    fn probe_absent_interface_is_not_found() {
        let fw = MockFirmware::absent();
        assert_eq!(
            query_current_status(&fw).unwrap_err(),
            FirmwareError::NotFound
        );
        assert_eq!(fw.query_calls.get(), 0, "no I/O against an absent interface");
    }

    #[test]
    fn probe_short_buffer_is_bad_length() {
        let fw = MockFirmware::new();
        *fw.state_block.borrow_mut() = vec![0; 4];
        assert_eq!(
            query_current_status(&fw).unwrap_err(),
            FirmwareError::BadLength(4)
        );
    }

    #[test]
    fn probe_long_buffer_is_bad_length() {
        let fw = MockFirmware::new();
        *fw.state_block.borrow_mut() = vec![0; 12];
        assert_eq!(
            query_current_status(&fw).unwrap_err(),
            FirmwareError::BadLength(12)
        );
    }

    // ── open / close ──

    #[test]
    fn open_registers_and_validates() {
        let (relay, fw) = open_relay(0x3, 0x1);
        assert_eq!(relay.instance_count(), 1);
        assert_eq!(relay.validity(), Validity::Valid);
        assert!(relay.query_validity().is_ok());
        assert_eq!(fw.query_calls.get(), 1, "probe runs exactly once per open");
    }

    #[test]
    fn open_failure_retains_no_state() {
        let fw = MockFirmware::new();
        *fw.state_block.borrow_mut() = vec![0; 7];
        let relay = RelayContext::new(&fw);
        assert!(relay.open(&fw).is_err());
        assert_eq!(relay.instance_count(), 0);
        assert_eq!(
            relay.query_validity().unwrap_err(),
            ErrorKind::InvalidArgument
        );
        assert!(relay.device_state().is_none());
    }

    #[test]
    fn open_io_failure_sets_io_kind() {
        let fw = MockFirmware::new();
        *fw.query_error.borrow_mut() = Some(FirmwareError::Io("unreachable".into()));
        let relay = RelayContext::new(&fw);
        assert!(relay.open(&fw).is_err());
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::Io);
    }

    #[test]
    fn open_non_buffer_response_sets_io_kind() {
        let fw = MockFirmware::new();
        *fw.query_error.borrow_mut() = Some(FirmwareError::NotABuffer);
        let relay = RelayContext::new(&fw);
        assert!(relay.open(&fw).is_err());
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::Io);
    }

    #[test]
    fn close_invalidates() {
        let (relay, _fw) = open_relay(0x3, 0x1);
        relay.close();
        assert_eq!(relay.instance_count(), 0);
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::NotFound);
        assert!(relay.device_state().is_none());
    }

    #[test]
    fn close_without_open_still_invalidates() {
        let fw = MockFirmware::new();
        let relay = RelayContext::new(&fw);
        relay.close();
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::NotFound);
    }

    #[test]
    fn reopen_after_close_is_valid_again() {
        let (relay, fw) = open_relay(0x3, 0x1);
        relay.close();
        relay.open(&fw).unwrap();
        assert!(relay.query_validity().is_ok());
        assert_eq!(relay.instance_count(), 1);
    }

    // ── query_validity ──

    #[test]
    fn validity_absent_interface_is_not_found() {
        let fw = MockFirmware::absent();
        let relay = RelayContext::new(&fw);
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::NotFound);
    }

    #[test]
    fn validity_before_probe_is_not_ready() {
        let fw = MockFirmware::new();
        let relay = RelayContext::new(&fw);
        assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::NotReady);
    }

    #[test]
    fn validity_is_idempotent_between_changes() {
        let (relay, _fw) = open_relay(0x1, 0x0);
        for _ in 0..5 {
            assert!(relay.query_validity().is_ok());
        }
        relay.close();
        for _ in 0..5 {
            assert_eq!(relay.query_validity().unwrap_err(), ErrorKind::NotFound);
        }
    }

    // ── process_event ──

    #[test]
    fn audio_event_updates_status_and_emits_key() {
        let (relay, _fw) = open_relay(0x3, 0x0);
        let sink = MockSink::new();

        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x1);

        assert_eq!(relay.current_state().as_deref(), Some("1"));
        assert_eq!(sink.report_count(), 1);
        assert_eq!(sink.last_report(), Some((InputAction::MicMuteKey, true)));
    }

    #[test]
    fn camera_event_updates_status_and_emits_switch() {
        let (relay, _fw) = open_relay(0x3, 0x1);
        let sink = MockSink::new();

        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_CAMERA, 0x3);

        assert_eq!(relay.current_state().as_deref(), Some("3"));
        assert_eq!(
            sink.last_report(),
            Some((InputAction::CameraLensCoverSwitch, true))
        );
    }

    #[test]
    fn unmapped_scancode_changes_nothing() {
        let (relay, _fw) = open_relay(0x3, 0x1);
        let sink = MockSink::new();

        // Unknown code within the namespace.
        relay.process_event(&sink, EVENT_TYPE_PRIVACY, 0x0007, 0x3);
        // Known code outside the namespace.
        relay.process_event(&sink, 0x0099, CODE_AUDIO, 0x3);

        assert_eq!(relay.current_state().as_deref(), Some("1"));
        assert_eq!(sink.report_count(), 0);
    }

    #[test]
    fn event_without_instance_is_dropped() {
        let fw = MockFirmware::new();
        let relay = RelayContext::new(&fw);
        let sink = MockSink::new();

        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x1);

        assert_eq!(sink.report_count(), 0);
        assert!(relay.device_state().is_none());
    }

    #[test]
    fn sink_failure_still_updates_status() {
        let (relay, _fw) = open_relay(0x3, 0x0);
        let sink = MockSink::new();
        sink.fail_report.set(true);

        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x1);

        // Emission failures are logged and dropped; the store already
        // holds the new status.
        assert_eq!(relay.current_state().as_deref(), Some("1"));
    }

    #[test]
    fn events_processed_in_delivery_order() {
        let (relay, _fw) = open_relay(0x3, 0x0);
        let sink = MockSink::new();

        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x1);
        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_CAMERA, 0x3);
        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x2);

        let reports = sink.reports.borrow();
        assert_eq!(
            *reports,
            vec![
                (InputAction::MicMuteKey, true),
                (InputAction::CameraLensCoverSwitch, true),
                (InputAction::MicMuteKey, true),
            ]
        );
        assert_eq!(relay.current_state().as_deref(), Some("2"));
    }

    // ── multi-registration ──

    #[test]
    fn only_first_instance_is_consulted() {
        let fw_a = MockFirmware::with_state(0x1, 0x0);
        let fw_b = MockFirmware::with_state(0x7, 0x7);
        let relay = RelayContext::new(&fw_a);
        relay.open(&fw_a).unwrap();
        relay.open(&fw_b).unwrap();
        assert_eq!(relay.instance_count(), 2);

        // Attributes read the head of the list.
        assert_eq!(relay.devices_supported().as_deref(), Some("1"));

        let sink = MockSink::new();
        relay.process_event(&sink, EVENT_TYPE_PRIVACY, CODE_AUDIO, 0x1);
        assert_eq!(relay.current_state().as_deref(), Some("1"));

        // Closing the head promotes the second registration.
        relay.close();
        assert_eq!(relay.devices_supported().as_deref(), Some("7"));
    }

    // ── attributes ──

    #[test]
    fn attribute_round_trip() {
        let (relay, _fw) = open_relay(0x3, 0x1);
        assert_eq!(relay.devices_supported().as_deref(), Some("3"));
        assert_eq!(relay.current_state().as_deref(), Some("1"));
    }

    #[test]
    fn attributes_absent_without_instance() {
        let fw = MockFirmware::new();
        let relay = RelayContext::new(&fw);
        assert!(relay.devices_supported().is_none());
        assert!(relay.current_state().is_none());
    }
}
