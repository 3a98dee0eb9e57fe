//! Firmware seam — trait over the privacy-notification firmware interface.
//!
//! The relay never talks to WMI/ACPI directly; the owning host hands it
//! something implementing [`FirmwareInterface`]. Tests use
//! [`mock::MockFirmware`].

use std::fmt;

use crate::status::ErrorKind;

// ── Error type ──

/// Firmware call errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareError {
    /// The privacy interface is absent on this system.
    NotFound,
    /// Firmware call failed outright.
    Io(String),
    /// The state query returned something that is not a byte buffer.
    NotABuffer,
    /// The state query returned a buffer of the wrong length.
    BadLength(usize),
    /// Allocation failure during setup, surfaced by the host backend.
    OutOfMemory,
}

impl FirmwareError {
    /// The taxonomy kind this error maps to.
    ///
    /// `NotABuffer` deliberately maps to `Io` (wrong object type from the
    /// firmware), only `BadLength` is an invalid-argument condition.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FirmwareError::NotFound => ErrorKind::NotFound,
            FirmwareError::Io(_) => ErrorKind::Io,
            FirmwareError::NotABuffer => ErrorKind::Io,
            FirmwareError::BadLength(_) => ErrorKind::InvalidArgument,
            FirmwareError::OutOfMemory => ErrorKind::OutOfMemory,
        }
    }
}

impl fmt::Display for FirmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareError::NotFound => write!(f, "privacy firmware interface not present"),
            FirmwareError::Io(e) => write!(f, "firmware call failed: {e}"),
            FirmwareError::NotABuffer => write!(f, "firmware state response is not a buffer"),
            FirmwareError::BadLength(len) => {
                write!(f, "firmware state buffer has unexpected length ({len})")
            }
            FirmwareError::OutOfMemory => write!(f, "allocation failed during setup"),
        }
    }
}

impl std::error::Error for FirmwareError {}

pub type Result<T> = std::result::Result<T, FirmwareError>;

// ── Trait ──

/// Handle to the firmware privacy-notification interface.
///
/// All calls are synchronous and expected to complete quickly; failures
/// are return values, never async faults.
pub trait FirmwareInterface {
    /// Whether the privacy GUID exists on this system at all.
    fn interface_present(&self) -> bool;

    /// Synchronous device-state block query.
    ///
    /// A well-formed response is 8 bytes:
    /// `[features_present: u32 LE][current_state: u32 LE]`.
    /// Length/type validation is the caller's job — this returns whatever
    /// the firmware produced.
    fn query_device_state(&self) -> Result<Vec<u8>>;

    /// Invoke the embedded controller's mute-acknowledge method.
    ///
    /// Errors if the EC handle is missing or does not expose the method.
    fn ec_ack(&self) -> Result<()>;
}

// ── Mock implementation for tests ──

pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory firmware for unit tests.
    ///
    /// The state block and failure injections are interior-mutable so a
    /// test can reconfigure the mock between calls without `&mut`.
    pub struct MockFirmware {
        /// Whether the privacy GUID is present.
        pub present: Cell<bool>,
        /// Response returned by `query_device_state` when no error is injected.
        pub state_block: RefCell<Vec<u8>>,
        /// If set, the next `query_device_state` returns this error.
        pub query_error: RefCell<Option<FirmwareError>>,
        /// Number of `query_device_state` calls observed.
        pub query_calls: Cell<u32>,
        /// Number of successful `ec_ack` calls observed.
        pub ec_acks: Cell<u32>,
        /// If true, `ec_ack` fails as if the EC handle were missing.
        pub fail_ec_ack: Cell<bool>,
    }

    impl Default for MockFirmware {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockFirmware {
        /// Present interface with an all-zero 8-byte state block.
        pub fn new() -> Self {
            MockFirmware {
                present: Cell::new(true),
                state_block: RefCell::new(vec![0; 8]),
                query_error: RefCell::new(None),
                query_calls: Cell::new(0),
                ec_acks: Cell::new(0),
                fail_ec_ack: Cell::new(false),
            }
        }

        /// Present interface reporting the given feature/state bitmaps.
        pub fn with_state(features: u32, status: u32) -> Self {
            let fw = Self::new();
            fw.set_state(features, status);
            fw
        }

        /// A system without the privacy GUID.
        pub fn absent() -> Self {
            let fw = Self::new();
            fw.present.set(false);
            fw
        }

        /// Replace the state block with a well-formed response.
        pub fn set_state(&self, features: u32, status: u32) {
            let mut block = Vec::with_capacity(8);
            block.extend_from_slice(&features.to_le_bytes());
            block.extend_from_slice(&status.to_le_bytes());
            *self.state_block.borrow_mut() = block;
        }
    }

    impl FirmwareInterface for MockFirmware {
        fn interface_present(&self) -> bool {
            self.present.get()
        }

        fn query_device_state(&self) -> Result<Vec<u8>> {
            self.query_calls.set(self.query_calls.get() + 1);
            if let Some(err) = self.query_error.borrow_mut().take() {
                return Err(err);
            }
            Ok(self.state_block.borrow().clone())
        }

        fn ec_ack(&self) -> Result<()> {
            if self.fail_ec_ack.get() {
                return Err(FirmwareError::Io("EC handle missing".into()));
            }
            self.ec_acks.set(self.ec_acks.get() + 1);
            Ok(())
        }
    }
}
