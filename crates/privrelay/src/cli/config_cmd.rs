//! `config` subcommand — show effective configuration and file paths.

use super::{Config, ConfigOutput, Result, kv, kv_width};

pub(super) fn cmd_config(json: bool) -> Result<()> {
    let config = Config::load();
    let path = Config::path();
    let exists = path.as_ref().is_some_and(|p| p.exists());

    if json {
        let out = ConfigOutput {
            config_file: path.map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    let w = kv_width(&[
        "Config file:",
        "Input device name:",
        "Event namespace:",
        "Simulated features:",
        "Simulated state:",
    ]);

    match path {
        Some(p) if exists => kv("Config file:", p.display(), w),
        Some(p) => kv("Config file:", format!("{} (not present)", p.display()), w),
        None => kv("Config file:", "unavailable", w),
    }
    kv("Input device name:", &config.input_device_name, w);
    kv("Event namespace:", format!("{:#06x}", config.event_namespace), w);
    kv(
        "Simulated features:",
        format!("{:#x}", config.simulated_features),
        w,
    );
    kv("Simulated state:", format!("{:#x}", config.simulated_state), w);
    Ok(())
}
