//! Tool configuration — TOML-based, platform-aware paths.
//!
//! Drives the bring-up CLI: the virtual input device name, the keymap
//! namespace, and the feature/state bitmaps the simulated firmware
//! reports at probe time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::protocol::{EVENT_TYPE_PRIVACY, INPUT_DEVICE_NAME, STATUS_CAMERA, STATUS_MICROPHONE};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# privrelay configuration — changes made outside the tool may be overwritten.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the registered virtual input device.
    #[serde(default = "default_input_device_name")]
    pub input_device_name: String,

    /// Keymap event-type namespace. Default: 0x0012.
    #[serde(default = "default_event_namespace")]
    pub event_namespace: u16,

    /// Feature bitmap the simulated firmware reports (mic | camera).
    #[serde(default = "default_features")]
    pub simulated_features: u32,

    /// Initial state bitmap the simulated firmware reports.
    #[serde(default)]
    pub simulated_state: u32,
}

fn default_input_device_name() -> String {
    INPUT_DEVICE_NAME.into()
}
fn default_event_namespace() -> u16 {
    EVENT_TYPE_PRIVACY
}
fn default_features() -> u32 {
    STATUS_MICROPHONE | STATUS_CAMERA
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_device_name: default_input_device_name(),
            event_namespace: default_event_namespace(),
            simulated_features: default_features(),
            simulated_state: 0,
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("privrelay"))
    }

    /// Full path to the config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default path, or defaults if not found.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load config from an arbitrary path.
    ///
    /// Missing file → defaults; unparsable file → defaults with a warning
    /// (a broken config must not keep the tool from starting).
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("config file {} is invalid, using defaults: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save config to an arbitrary path atomically (temp file + rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }
}
