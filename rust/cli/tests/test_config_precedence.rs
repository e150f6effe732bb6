use jokerpoker_cli::run;
use serde_json::Value;
use serial_test::serial;
use std::io::Write as _;

const VARS: [&str; 5] = [
    "JOKERPOKER_CONFIG",
    "JOKERPOKER_SEED",
    "JOKERPOKER_PRESET",
    "JOKERPOKER_PLAYERS",
    "JOKERPOKER_STARTING_BANK",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

fn set_env(key: &str, value: impl AsRef<std::ffi::OsStr>) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn cfg() -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["jokerpoker", "cfg"], &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(body.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn defaults_are_reported_with_default_source() {
    clear_env();
    let (code, stdout, stderr) = cfg();
    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["seed"]["value"], Value::Null);
    assert_eq!(json["preset"]["value"].as_str(), Some("classic"));
    assert_eq!(json["players"]["value"].as_u64(), Some(3));
    assert_eq!(json["starting_bank"]["value"].as_u64(), Some(1000));
    for key in ["seed", "preset", "players", "starting_bank"] {
        assert_eq!(json[key]["source"].as_str(), Some("default"), "{key}");
    }
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let file = config_file("seed = 456\npreset = \"foolish\"\nstarting_bank = 500\n");
    set_env("JOKERPOKER_CONFIG", file.path());

    let (code, stdout, _) = cfg();
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["seed"]["value"].as_u64(), Some(456));
    assert_eq!(json["seed"]["source"].as_str(), Some("file"));
    assert_eq!(json["preset"]["value"].as_str(), Some("foolish"));
    assert_eq!(json["starting_bank"]["source"].as_str(), Some("file"));
    assert_eq!(json["players"]["source"].as_str(), Some("default"));

    set_env("JOKERPOKER_SEED", "7");
    set_env("JOKERPOKER_PRESET", "bizarre");
    let (code, stdout, _) = cfg();
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["seed"]["value"].as_u64(), Some(7));
    assert_eq!(json["seed"]["source"].as_str(), Some("env"));
    assert_eq!(json["preset"]["value"].as_str(), Some("bizarre"));
    assert_eq!(json["preset"]["source"].as_str(), Some("env"));
    assert_eq!(json["starting_bank"]["value"].as_u64(), Some(500));
    clear_env();
}

#[test]
#[serial]
fn flags_override_env() {
    clear_env();
    set_env("JOKERPOKER_PLAYERS", "5");
    set_env("JOKERPOKER_STARTING_BANK", "200");
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(
        ["jokerpoker", "sim", "--rounds", "1", "--players", "2", "--seed", "3"],
        &mut out,
        &mut err,
    );
    clear_env();
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));
    let stdout = String::from_utf8_lossy(&out);
    assert!(stdout.contains("  p1"));
    assert!(stdout.contains("  p2"));
    assert!(!stdout.contains("  p3"));
    assert!(stdout.contains("Seed: 3"));
}

#[test]
#[serial]
fn invalid_env_value_fails() {
    clear_env();
    set_env("JOKERPOKER_PLAYERS", "many");
    let (code, stdout, stderr) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Invalid players"));
}

#[test]
#[serial]
fn unknown_file_key_fails() {
    clear_env();
    let file = config_file("level = 3\n");
    set_env("JOKERPOKER_CONFIG", file.path());
    let (code, _, stderr) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(stderr.contains("cannot parse config file"));
}

#[test]
#[serial]
fn invalid_preset_in_file_fails() {
    clear_env();
    let file = config_file("preset = \"omaha\"\n");
    set_env("JOKERPOKER_CONFIG", file.path());
    let (code, _, stderr) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(stderr.contains("preset must be one of"));
}
