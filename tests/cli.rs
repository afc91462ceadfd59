//! Command-line integration tests
//!
//! These run the built binary for the modes that exit before the terminal
//! is taken over.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const DASHBOARD: &str = r#"
[connection]
url = "http://nostromo.local:8123"
token = "special-order-937"

[[views]]
title = "BRIDGE"

[[views.cards]]
type = "muthur-clock-card"

[[views.cards]]
type = "muthur-sensor-card"
entity = "sensor.hull_temp"

[[views]]
title = "CARGO"

[[views.cards]]
type = "muthur-light-card"
entity = "light.cargo_bay"
"#;

/// Run the binary with logs kept inside `home`.
fn muthur(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_muthur"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .output()
        .expect("failed to run muthur")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_cards_names_every_type() {
    let home = TempDir::new().unwrap();
    let output = muthur(&home, &["--list-cards"]);

    assert!(output.status.success());
    let listing = stdout(&output);
    for type_id in [
        "muthur-status-card",
        "muthur-sensor-card",
        "muthur-button-card",
        "muthur-text-card",
        "muthur-gauge-card",
        "muthur-clock-card",
        "muthur-glance-card",
        "muthur-light-card",
        "muthur-picture-card",
        "muthur-weather-card",
        "muthur-alarm-card",
    ] {
        assert!(listing.contains(type_id), "missing {type_id} in:\n{listing}");
    }
}

#[test]
fn test_print_stub_emits_card_block() {
    let home = TempDir::new().unwrap();
    let output = muthur(&home, &["--print-stub", "muthur-alarm-card"]);

    assert!(output.status.success());
    let stub = stdout(&output);
    assert!(stub.starts_with("[[views.cards]]"));
    assert!(stub.contains(r#"type = "muthur-alarm-card""#));
    assert!(stub.contains("show_keypad = true"));
}

#[test]
fn test_print_stub_unknown_type_fails() {
    let home = TempDir::new().unwrap();
    let output = muthur(&home, &["--print-stub", "muthur-toaster-card"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown card type: muthur-toaster-card"));
}

#[test]
fn test_check_accepts_valid_dashboard() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("dashboard.toml");
    fs::write(&path, DASHBOARD).unwrap();

    let output = muthur(&home, &["--check", "--config", path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("OK, 2 views, 3 cards"));
}

#[test]
fn test_check_rejects_card_without_entity() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("dashboard.toml");
    fs::write(
        &path,
        r#"
[connection]
url = "http://nostromo.local:8123"

[[views]]
[[views.cards]]
type = "muthur-gauge-card"
"#,
    )
    .unwrap();

    let output = muthur(&home, &["--check", "--config", path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Cannot load"));
}

#[test]
fn test_check_reports_missing_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("absent.toml");

    let output = muthur(&home, &["--check", "--config", path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("absent.toml"));
}
