//! `event` subcommand — inject one firmware event triple into the relay.

use privrelay_lib::protocol::composite_scancode;

use super::{
    Config, EventOutput, Result, action_name, kv, kv_width, make_sink, open_simulated,
};

pub(super) fn cmd_event(
    event_type: Option<u16>,
    code: u16,
    status: u32,
    uinput: bool,
    json: bool,
) -> Result<()> {
    let config = Config::load();
    let (relay, _fw) = open_simulated(&config)?;
    let sink = make_sink(uinput, &config.input_device_name)?;

    let event_type = event_type.unwrap_or(config.event_namespace);
    let scancode = composite_scancode(event_type, code);
    let mapped = relay.keymap().lookup(scancode).map(|e| e.action);

    relay.process_event(&sink, event_type, code, status);

    if json {
        let out = EventOutput {
            scancode: format!("{scancode:#010x}"),
            mapped: mapped.is_some(),
            action: mapped.map(|a| action_name(a).to_string()),
            devices_supported: relay.devices_supported(),
            current_state: relay.current_state(),
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    let w = kv_width(&["Scancode:", "Action:", "current_state:"]);
    kv("Scancode:", format!("{scancode:#010x}"), w);
    match mapped {
        Some(action) => kv("Action:", action_name(action), w),
        None => kv("Action:", "none (unmapped scancode, event dropped)", w),
    }
    kv(
        "current_state:",
        relay.current_state().as_deref().unwrap_or("-"),
        w,
    );
    Ok(())
}
