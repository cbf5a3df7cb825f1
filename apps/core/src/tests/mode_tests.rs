//! Mode State Tests
//!
//! File-backed persistence: round trips, restarts, corruption and
//! self-healing of unknown values.

use crate::brain::{FileModeStore, Mode, ModeState, ModeStore};
use crate::error::AppError;
use std::fs;
use tempfile::TempDir;

fn mode_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("system_mode.json")
}

#[test]
fn test_missing_file_defaults_to_general_and_is_written() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);

    let state = ModeState::file(&path);
    assert_eq!(state.get_mode().unwrap(), Mode::General);

    let raw = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["mode"], "General");
}

#[test]
fn test_round_trip_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);

    {
        let state = ModeState::file(&path);
        state.set_mode(Mode::Project).unwrap();
        assert_eq!(state.get_mode().unwrap(), Mode::Project);
    }

    // A fresh instance re-reads the persisted file.
    let restarted = ModeState::file(&path);
    assert_eq!(restarted.get_mode().unwrap(), Mode::Project);
}

#[test]
fn test_file_format() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);

    ModeState::file(&path).set_mode(Mode::CodingPractice).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({ "mode": "CodingPractice" }));
}

#[test]
fn test_unknown_mode_self_heals() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);
    fs::write(&path, r#"{"mode": "Crypto"}"#).unwrap();

    let state = ModeState::file(&path);
    assert_eq!(state.get_mode().unwrap(), Mode::General);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["mode"], "General");
}

#[test]
fn test_record_without_mode_self_heals() {
    for body in ["{}", r#"{"mode": null}"#, r#"{"theme": "dark"}"#] {
        let dir = TempDir::new().unwrap();
        let path = mode_file(&dir);
        fs::write(&path, body).unwrap();

        let state = ModeState::file(&path);
        assert_eq!(state.get_mode().unwrap(), Mode::General, "body {}", body);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "General" }), "body {}", body);
    }
}

#[test]
fn test_legacy_lowercase_name_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);
    fs::write(&path, r#"{"mode": "stock"}"#).unwrap();

    assert_eq!(ModeState::file(&path).get_mode().unwrap(), Mode::Stock);
}

#[test]
fn test_corrupt_file_is_storage_error_and_current_recovers() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);
    fs::write(&path, "{ this is not json").unwrap();

    let state = ModeState::file(&path);
    match state.get_mode() {
        Err(AppError::Storage(msg)) => assert!(msg.contains("corrupt")),
        other => panic!("Expected Storage error, got {:?}", other),
    }

    assert_eq!(state.current(), Mode::General);
    // The reset is persisted, so the next read succeeds.
    assert_eq!(state.get_mode().unwrap(), Mode::General);
}

#[test]
fn test_failed_write_keeps_previous_value() {
    let dir = TempDir::new().unwrap();
    let path = mode_file(&dir);
    let store = FileModeStore::new(&path);
    store.save(Mode::Stock).unwrap();

    // Block the temporary file path with a directory so the next write fails.
    fs::create_dir(dir.path().join("system_mode.json.tmp")).unwrap();
    assert!(store.save(Mode::Project).is_err());

    let record = store.load().unwrap().unwrap();
    assert_eq!(record.mode.as_deref(), Some("Stock"));
}

#[test]
fn test_creates_missing_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state").join("mode.json");

    ModeState::file(&path).set_mode(Mode::PersonalAssistant).unwrap();
    assert_eq!(ModeState::file(&path).get_mode().unwrap(), Mode::PersonalAssistant);
}
