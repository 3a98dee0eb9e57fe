//! `status` subcommand — show relay attributes and the validity gate.

use privrelay_lib::protocol::{STATUS_CAMERA, STATUS_MICROPHONE, STATUS_PRIVACY_SCREEN};

use super::{
    Config, FeaturesJson, Result, StatusOutput, ValidityJson, kv, kv_width, open_simulated,
    validity_detail,
};

pub(super) fn cmd_status(json: bool) -> Result<()> {
    let config = Config::load();
    let (relay, _fw) = open_simulated(&config)?;

    let state = relay.device_state();
    let (valid, detail) = validity_detail(relay.query_validity());

    let features = state.map(|s| FeaturesJson {
        microphone: s.supports(STATUS_MICROPHONE),
        camera: s.supports(STATUS_CAMERA),
        privacy_screen: s.supports(STATUS_PRIVACY_SCREEN),
        microphone_muted: s.microphone_muted(),
        camera_covered: s.camera_covered(),
        privacy_screen_on: s.privacy_screen_on(),
    });

    if json {
        let out = StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            validity: ValidityJson { valid, detail },
            devices_supported: relay.devices_supported(),
            current_state: relay.current_state(),
            features,
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    let w = kv_width(&[
        "Validity:",
        "devices_supported:",
        "current_state:",
        "Microphone:",
        "Camera:",
        "Privacy screen:",
    ]);

    kv("Validity:", &detail, w);
    kv(
        "devices_supported:",
        relay.devices_supported().as_deref().unwrap_or("-"),
        w,
    );
    kv(
        "current_state:",
        relay.current_state().as_deref().unwrap_or("-"),
        w,
    );

    if let Some(f) = features {
        kv("Microphone:", feature_line(f.microphone, f.microphone_muted, "muted"), w);
        kv("Camera:", feature_line(f.camera, f.camera_covered, "covered"), w);
        kv(
            "Privacy screen:",
            feature_line(f.privacy_screen, f.privacy_screen_on, "on"),
            w,
        );
    }
    Ok(())
}

fn feature_line(present: bool, engaged: bool, engaged_word: &str) -> String {
    if !present {
        return "not present".into();
    }
    if engaged {
        engaged_word.into()
    } else {
        format!("not {engaged_word}")
    }
}
