//! Binary tests: exit codes, output destinations and configuration.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

const ITEM: &str = r#"package store

import "sync"

type Item struct {
	sync.Mutex
	ID     string  `json:"id"`
	Label  string  `json:"label" optional:"true"`
	Weight float64 `json:"wt"`
}

type itemOverride struct {
	Colour string
}
"#;

struct Fixture {
    package: TempDir,
    config_home: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let package = TempDir::new().unwrap();
        fs::write(package.path().join("go.mod"), "module example.com/store\n").unwrap();
        fs::write(package.path().join("item.go"), ITEM).unwrap();
        Self {
            package,
            config_home: TempDir::new().unwrap(),
        }
    }

    fn codecgen(&self) -> Command {
        let mut cmd = Command::cargo_bin("codecgen").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("RUST_LOG")
            .arg("--dir")
            .arg(self.package.path());
        cmd
    }
}

#[test]
fn test_generates_to_stdout() {
    let fixture = Fixture::new();
    let output = fixture.codecgen().args(["--type", "Item"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("// Code generated by codecgen. DO NOT EDIT.\n"));
    assert!(stdout.contains("func (x *Item) MarshalJSON() ([]byte, error) {"));
    assert!(stdout.contains("missing required field 'wt' in JSON Item"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("(Item.Mutex) Warning: ignoring embedded field"));
}

#[test]
fn test_writes_output_file() {
    let fixture = Fixture::new();
    let out = fixture.package.path().join("item_codec.go");
    fs::write(&out, "stale").unwrap();

    fixture
        .codecgen()
        .args(["--type", "Item", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("// Code generated by codecgen. DO NOT EDIT.\n"));
    assert!(!written.contains("stale"));
}

#[test]
fn test_dash_writes_stdout() {
    let fixture = Fixture::new();
    let output = fixture
        .codecgen()
        .args(["--type", "Item", "--out", "-"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("type ItemJSON struct {"));
}

#[test]
fn test_unknown_type_fails() {
    let fixture = Fixture::new();
    let output = fixture.codecgen().args(["--type", "Missing"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: can't find Missing: no such identifier"));
}

#[test]
fn test_bad_override_fails_with_position() {
    let fixture = Fixture::new();
    let output = fixture
        .codecgen()
        .args(["--type", "Item", "--field-override", "itemOverride"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("item.go:13:2: no matching field for Colour in original type Item"));
}

#[test]
fn test_suffix_from_config_and_flag() {
    let fixture = Fixture::new();
    fs::write(
        fixture.package.path().join("codecgen.toml"),
        "[generate]\nsuffix = \"Wire\"\n",
    )
    .unwrap();

    let output = fixture.codecgen().args(["--type", "Item"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("type ItemWire struct {"));

    let output = fixture
        .codecgen()
        .args(["--type", "Item", "--suffix", "Codec"])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("type ItemCodec struct {"));
}

#[test]
fn test_malformed_config_fails() {
    let fixture = Fixture::new();
    fs::write(fixture.package.path().join("codecgen.toml"), "[generate\n").unwrap();
    let output = fixture.codecgen().args(["--type", "Item"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}

#[test]
fn test_print_model() {
    let fixture = Fixture::new();
    let output = fixture
        .codecgen()
        .args(["--type", "Item", "--print-model"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["name"], "ItemJSON");
    assert_eq!(model["original_name"], "Item");
    assert_eq!(model["fields"].as_array().unwrap().len(), 3);
}

#[test]
fn test_missing_package_fails() {
    let fixture = Fixture::new();
    let empty = TempDir::new().unwrap();
    let output = Command::cargo_bin("codecgen")
        .unwrap()
        .env("XDG_CONFIG_HOME", fixture.config_home.path())
        .arg("--dir")
        .arg(empty.path())
        .args(["--type", "Item"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no Go package found"));
}
