//! `validity` subcommand — query the gate the audio stack consults.

use super::{Config, Result, ValidityJson, open_simulated, validity_detail};

pub(super) fn cmd_validity(json: bool) -> Result<()> {
    let config = Config::load();
    let (relay, _fw) = open_simulated(&config)?;

    let (valid, detail) = validity_detail(relay.query_validity());

    if json {
        let out = ValidityJson { valid, detail };
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    } else {
        println!("{detail}");
    }

    if !valid {
        std::process::exit(1);
    }
    Ok(())
}
