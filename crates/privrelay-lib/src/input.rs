//! Input emission seam — abstract actions + sink trait + Linux uinput backend.
//!
//! The relay emits [`InputAction`]s through an [`InputSink`]; the Linux
//! backend registers a virtual input device (uinput via the `evdev`
//! crate) carrying exactly the mic-mute key and the camera lens-cover
//! switch. Tests use [`mock::MockSink`].

use std::fmt;

// ── Error type ──

/// Input emission errors.
#[derive(Debug)]
pub enum InputError {
    /// Virtual input device could not be registered.
    RegisterFailed(String),
    /// Event write to the input device failed.
    EmitFailed(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::RegisterFailed(e) => {
                write!(f, "Failed to register input device: {e}")
            }
            InputError::EmitFailed(e) => write!(f, "Failed to emit input event: {e}"),
        }
    }
}

impl std::error::Error for InputError {}

pub type Result<T> = std::result::Result<T, InputError>;

// ── Actions ──

/// Abstract input action a privacy event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Mic-mute key press. Auto-released by the sink (press + release pair).
    MicMuteKey,
    /// Camera lens-cover switch. Reported as a switch state, no release.
    CameraLensCoverSwitch,
}

impl InputAction {
    /// Whether this action is a momentary key (auto-release) rather than
    /// a latched switch state.
    pub fn is_key(&self) -> bool {
        matches!(self, InputAction::MicMuteKey)
    }
}

// ── Trait ──

/// Destination for relay-emitted input events.
pub trait InputSink {
    /// Report an action.
    ///
    /// For key actions `active` is always reported as a full press+release
    /// pair; for switch actions `active` is the switch state itself.
    fn report(&self, action: InputAction, active: bool) -> Result<()>;
}

impl<T: InputSink + ?Sized> InputSink for Box<T> {
    fn report(&self, action: InputAction, active: bool) -> Result<()> {
        (**self).report(action, active)
    }
}

// ── Mock implementation for tests ──

pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Recording sink for unit tests.
    #[derive(Default)]
    pub struct MockSink {
        /// Every `(action, active)` pair reported, in order.
        pub reports: RefCell<Vec<(InputAction, bool)>>,
        /// If true, `report` returns an error (and records nothing).
        pub fail_report: Cell<bool>,
    }

    impl MockSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of reports observed so far.
        pub fn report_count(&self) -> usize {
            self.reports.borrow().len()
        }

        /// The most recent report, if any.
        pub fn last_report(&self) -> Option<(InputAction, bool)> {
            self.reports.borrow().last().copied()
        }
    }

    impl InputSink for MockSink {
        fn report(&self, action: InputAction, active: bool) -> Result<()> {
            if self.fail_report.get() {
                return Err(InputError::EmitFailed("mock: emit failure injected".into()));
            }
            self.reports.borrow_mut().push((action, active));
            Ok(())
        }
    }
}

// ── Linux uinput backend ──

#[cfg(target_os = "linux")]
mod uinput_impl {
    use super::*;
    use std::cell::RefCell;

    use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
    use evdev::{AttributeSet, EventType, InputEvent, Key, SwitchType};

    /// Virtual input device backed by uinput.
    ///
    /// Registers one device carrying KEY_MICMUTE and SW_CAMERA_LENS_COVER,
    /// matching the keymap table. Requires write access to /dev/uinput.
    pub struct UinputSink {
        device: RefCell<VirtualDevice>,
    }

    impl UinputSink {
        /// Register the virtual device under the given name.
        pub fn register(name: &str) -> Result<Self> {
            let mut keys = AttributeSet::<Key>::new();
            keys.insert(Key::KEY_MICMUTE);
            let mut switches = AttributeSet::<SwitchType>::new();
            switches.insert(SwitchType::SW_CAMERA_LENS_COVER);

            let device = VirtualDeviceBuilder::new()
                .and_then(|b| {
                    b.name(name)
                        .with_keys(&keys)?
                        .with_switches(&switches)?
                        .build()
                })
                .map_err(|e| InputError::RegisterFailed(e.to_string()))?;

            log::debug!("registered virtual input device {name:?}");
            Ok(UinputSink {
                device: RefCell::new(device),
            })
        }
    }

    impl InputSink for UinputSink {
        fn report(&self, action: InputAction, active: bool) -> Result<()> {
            let mut device = self.device.borrow_mut();
            let events = match action {
                // Momentary key: press + release in one write; the kernel
                // inserts SYN_REPORT after the batch.
                InputAction::MicMuteKey => vec![
                    InputEvent::new(EventType::KEY, Key::KEY_MICMUTE.code(), i32::from(active)),
                    InputEvent::new(EventType::KEY, Key::KEY_MICMUTE.code(), 0),
                ],
                InputAction::CameraLensCoverSwitch => vec![InputEvent::new(
                    EventType::SWITCH,
                    SwitchType::SW_CAMERA_LENS_COVER.0,
                    i32::from(active),
                )],
            };
            device
                .emit(&events)
                .map_err(|e| InputError::EmitFailed(e.to_string()))
        }
    }
}

#[cfg(target_os = "linux")]
pub use uinput_impl::UinputSink;

#[cfg(test)]
mod tests {
    use super::mock::MockSink;
    use super::*;

    #[test]
    fn action_kinds() {
        assert!(InputAction::MicMuteKey.is_key());
        assert!(!InputAction::CameraLensCoverSwitch.is_key());
    }

    #[test]
    fn mock_sink_records_in_order() {
        let sink = MockSink::new();
        sink.report(InputAction::MicMuteKey, true).unwrap();
        sink.report(InputAction::CameraLensCoverSwitch, true).unwrap();

        let reports = sink.reports.borrow();
        assert_eq!(
            *reports,
            vec![
                (InputAction::MicMuteKey, true),
                (InputAction::CameraLensCoverSwitch, true),
            ]
        );
    }

    #[test]
    fn mock_sink_failure_records_nothing() {
        let sink = MockSink::new();
        sink.fail_report.set(true);
        assert!(sink.report(InputAction::MicMuteKey, true).is_err());
        assert_eq!(sink.report_count(), 0);
    }

    #[test]
    fn display_register_failed() {
        let e = InputError::RegisterFailed("permission denied".into());
        assert_eq!(
            e.to_string(),
            "Failed to register input device: permission denied"
        );
    }
}
