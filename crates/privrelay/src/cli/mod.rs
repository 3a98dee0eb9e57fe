//! CLI subcommands — relay status, validity gate, event injection.

mod config_cmd;
mod event;
mod status;
mod validity;
mod watch;

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use privrelay_lib::config::Config;
pub(super) use privrelay_lib::error::Result;
pub(super) use privrelay_lib::firmware::mock::MockFirmware;
pub(super) use privrelay_lib::input::{InputAction, InputSink};
pub(super) use privrelay_lib::relay::RelayContext;
pub(super) use privrelay_lib::status::ErrorKind;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
pub(super) fn kv_width(keys: &[&str]) -> usize {
    keys.iter().map(|k| k.len()).max().unwrap_or(0) + PADDING
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

// ── Simulated relay setup ──

/// Build a relay over a simulated firmware seeded from config, and open it.
///
/// Probe failures are surfaced (they can only come from a nonsensical
/// config since the simulated state block is always well-formed).
pub(super) fn open_simulated(config: &Config) -> Result<(RelayContext, MockFirmware)> {
    let fw = MockFirmware::with_state(config.simulated_features, config.simulated_state);
    let relay = RelayContext::with_namespace(&fw, config.event_namespace);
    relay.open(&fw)?;
    Ok((relay, fw))
}

/// Choose the event emission backend.
///
/// `--uinput` registers a real virtual input device (Linux only; needs
/// /dev/uinput access); otherwise events land in an in-memory sink.
pub(super) fn make_sink(uinput: bool, device_name: &str) -> Result<Box<dyn InputSink>> {
    if uinput {
        #[cfg(target_os = "linux")]
        {
            let sink = privrelay_lib::input::UinputSink::register(device_name)?;
            return Ok(Box::new(sink));
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _ = device_name;
            return Err(privrelay_lib::PrivrelayError::Config(
                "--uinput is only available on Linux".into(),
            ));
        }
    }
    Ok(Box::new(privrelay_lib::input::mock::MockSink::new()))
}

/// Describe a gate result for human/JSON output.
pub(super) fn validity_detail(result: std::result::Result<(), ErrorKind>) -> (bool, String) {
    match result {
        Ok(()) => (true, "valid".into()),
        Err(kind) => (false, kind.to_string()),
    }
}

/// Short action name for output.
pub(super) fn action_name(action: InputAction) -> &'static str {
    match action {
        InputAction::MicMuteKey => "mic-mute key",
        InputAction::CameraLensCoverSwitch => "camera-lens-cover switch",
    }
}

// ── Argument parsing ──

/// Parse a numeric CLI argument, accepting `0x` hex or decimal.
pub(super) fn parse_u16(s: &str) -> std::result::Result<u16, String> {
    parse_num(s).and_then(|v| {
        u16::try_from(v).map_err(|_| format!("value out of range for u16: {s}"))
    })
}

/// Parse a 32-bit numeric CLI argument, accepting `0x` hex or decimal.
pub(super) fn parse_u32(s: &str) -> std::result::Result<u32, String> {
    parse_num(s)
}

fn parse_num(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {s}"))
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub validity: ValidityJson,
    pub devices_supported: Option<String>,
    pub current_state: Option<String>,
    pub features: Option<FeaturesJson>,
}

#[derive(Serialize)]
pub(super) struct ValidityJson {
    pub valid: bool,
    pub detail: String,
}

#[derive(Serialize)]
pub(super) struct FeaturesJson {
    pub microphone: bool,
    pub camera: bool,
    pub privacy_screen: bool,
    pub microphone_muted: bool,
    pub camera_covered: bool,
    pub privacy_screen_on: bool,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Serialize)]
pub(super) struct EventOutput {
    pub scancode: String,
    pub mapped: bool,
    pub action: Option<String>,
    pub devices_supported: Option<String>,
    pub current_state: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show relay status attributes and the validity gate
    Status,

    /// Query the validity gate (exits nonzero when invalid)
    Validity,

    /// Inject one firmware event triple into a simulated relay
    Event {
        /// Event code, e.g. 0x0001 (mic) or 0x0002 (camera)
        #[arg(value_parser = parse_u16)]
        code: u16,
        /// New status bitmap carried by the event
        #[arg(value_parser = parse_u32)]
        status: u32,
        /// Event type namespace (default: from config)
        #[arg(long, value_parser = parse_u16)]
        event_type: Option<u16>,
        /// Emit through a real virtual input device (Linux, needs /dev/uinput)
        #[arg(long)]
        uinput: bool,
    },

    /// Feed events from stdin (`[type] code status` per line) until EOF
    Watch {
        /// Emit through a real virtual input device (Linux, needs /dev/uinput)
        #[arg(long)]
        uinput: bool,
    },

    /// Show current configuration and file paths
    Config,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool) -> Result<()> {
    match cmd {
        Command::Status => status::cmd_status(json),
        Command::Validity => validity::cmd_validity(json),
        Command::Event {
            code,
            status,
            event_type,
            uinput,
        } => event::cmd_event(event_type, code, status, uinput, json),
        Command::Watch { uinput } => {
            if json {
                warn_json_unsupported("watch");
            }
            watch::cmd_watch(uinput)
        }
        Command::Config => config_cmd::cmd_config(json),
    }
}
