//! Integration tests for the `privrelay` binary.
//!
//! These tests exercise the CLI via `assert_cmd`, verifying that the
//! subcommands produce expected output over the simulated relay.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("privrelay")
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("privrelay"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_status_json_produces_valid_json() {
    let output = cli()
        .args(["--json", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("status --json should produce valid JSON");
    assert!(
        json["validity"]["valid"].is_boolean(),
        "JSON output should contain validity.valid"
    );
    assert!(
        json["devices_supported"].is_string() || json["devices_supported"].is_null(),
        "devices_supported should be string or null"
    );
}

#[test]
fn cli_config_json_produces_valid_json() {
    let output = cli()
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(
        json["settings"].is_object(),
        "JSON output should contain 'settings' object"
    );
    assert!(
        json["config_file"].is_string() || json["config_file"].is_null(),
        "config_file should be string or null"
    );
}

#[test]
fn cli_validity_succeeds_on_simulated_relay() {
    cli()
        .arg("validity")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

// ── Event injection ──

#[test]
fn cli_event_camera_is_mapped() {
    let output = cli()
        .args(["--json", "event", "0x0002", "0x3"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("event --json should produce valid JSON");
    assert_eq!(json["mapped"], serde_json::json!(true));
    assert!(
        json["action"]
            .as_str()
            .is_some_and(|a| a.contains("camera")),
        "camera code should map to the lens-cover switch"
    );
    assert!(json["current_state"].is_string());
}

#[test]
fn cli_event_unmapped_code_is_dropped() {
    let output = cli()
        .args(["--json", "event", "0x00ff", "0x1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["mapped"], serde_json::json!(false));
    assert!(json["action"].is_null());
}

#[test]
fn cli_event_rejects_bad_number() {
    cli()
        .args(["event", "zzz", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid number"));
}

// ── Watch ──

#[test]
fn cli_watch_consumes_stdin_feed() {
    cli()
        .arg("watch")
        .write_stdin("0x0001 0x1\n# comment\n0x0002 0x3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("mic-mute key"))
        .stdout(predicate::str::contains("camera-lens-cover switch"));
}

#[test]
fn cli_watch_reports_unmapped_lines() {
    cli()
        .arg("watch")
        .write_stdin("0x0099 0x1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropped (unmapped)"));
}
