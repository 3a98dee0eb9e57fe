//! privrelay — firmware privacy-notification relay for microphone/camera
//! mute hardware.

pub mod config;
pub mod error;
pub mod firmware;
pub mod indicator;
pub mod input;
pub mod keymap;
pub mod protocol;
pub mod relay;
pub mod status;

pub use error::PrivrelayError;
