//! Unified error type for the privrelay-lib crate.
//!
//! [`PrivrelayError`] wraps module-specific errors (`FirmwareError`,
//! `InputError`) and I/O/config failures. `From` impls allow `?` to
//! propagate across module boundaries seamlessly; [`PrivrelayError::kind`]
//! collapses any error to the taxonomy the validity gate speaks.

use std::fmt;

use crate::firmware::FirmwareError;
use crate::input::InputError;
use crate::status::ErrorKind;

/// Unified error type for privrelay-lib operations.
#[derive(Debug)]
pub enum PrivrelayError {
    /// Firmware interface error (probe, EC ack).
    Firmware(FirmwareError),
    /// Input device error (registration, event emission).
    Input(InputError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration error.
    Config(String),
}

impl PrivrelayError {
    /// The taxonomy kind this error maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrivrelayError::Firmware(e) => e.kind(),
            PrivrelayError::Input(_) => ErrorKind::Io,
            PrivrelayError::Io(_) => ErrorKind::Io,
            PrivrelayError::Config(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for PrivrelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivrelayError::Firmware(e) => write!(f, "{e}"),
            PrivrelayError::Input(e) => write!(f, "{e}"),
            PrivrelayError::Io(e) => write!(f, "I/O error: {e}"),
            PrivrelayError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PrivrelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrivrelayError::Firmware(e) => Some(e),
            PrivrelayError::Input(e) => Some(e),
            PrivrelayError::Io(e) => Some(e),
            PrivrelayError::Config(_) => None,
        }
    }
}

impl From<FirmwareError> for PrivrelayError {
    fn from(e: FirmwareError) -> Self {
        PrivrelayError::Firmware(e)
    }
}

impl From<InputError> for PrivrelayError {
    fn from(e: InputError) -> Self {
        PrivrelayError::Input(e)
    }
}

impl From<std::io::Error> for PrivrelayError {
    fn from(e: std::io::Error) -> Self {
        PrivrelayError::Io(e)
    }
}

/// Crate-level Result alias using [`PrivrelayError`].
pub type Result<T> = std::result::Result<T, PrivrelayError>;
