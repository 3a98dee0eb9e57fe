//! `watch` subcommand — stdin-driven event feed for bring-up testing.
//!
//! Each input line is `[type] code status` (hex with `0x` prefix or
//! decimal); omitted type defaults to the configured namespace. Feed
//! stops at EOF or Ctrl+C.

use std::io::BufRead;
use std::sync::atomic::Ordering;

use super::{
    Config, RUNNING, Result, action_name, make_sink, open_simulated, parse_u16, parse_u32,
};
use privrelay_lib::protocol::composite_scancode;

pub(super) fn cmd_watch(uinput: bool) -> Result<()> {
    let config = Config::load();
    let (relay, _fw) = open_simulated(&config)?;
    let sink = make_sink(uinput, &config.input_device_name)?;

    println!("Feeding events ([type] code status per line, Ctrl+C or EOF to stop)");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if !RUNNING.load(Ordering::SeqCst) {
            break;
        }
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (event_type, code, status) = match parse_line(line, config.event_namespace) {
            Ok(triple) => triple,
            Err(e) => {
                eprintln!("skipped: {e}");
                continue;
            }
        };

        let scancode = composite_scancode(event_type, code);
        let mapped = relay.keymap().lookup(scancode).map(|e| e.action);
        relay.process_event(&sink, event_type, code, status);

        match mapped {
            Some(action) => println!(
                "{scancode:#010x} -> {} (current_state {})",
                action_name(action),
                relay.current_state().as_deref().unwrap_or("-"),
            ),
            None => println!("{scancode:#010x} -> dropped (unmapped)"),
        }
    }
    Ok(())
}

/// Parse `[type] code status` into an event triple.
fn parse_line(line: &str, default_type: u16) -> std::result::Result<(u16, u16, u32), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [code, status] => Ok((default_type, parse_u16(code)?, parse_u32(status)?)),
        [etype, code, status] => Ok((parse_u16(etype)?, parse_u16(code)?, parse_u32(status)?)),
        _ => Err(format!("expected `[type] code status`, got {line:?}")),
    }
}
