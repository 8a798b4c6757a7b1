use precog::{AppConfig, ConfigError, KeyMap, ThemeChoice};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("precog.json");
    fs::write(
        &path,
        r#"{
            "data": "https://example.org/tree.json",
            "share_origin": "https://precog.example",
            "theme": "light",
            "replay_timings": { "pause_ms": 500 },
            "keys": { "open_replay": "enter" }
        }"#,
    )
    .unwrap();

    let config = AppConfig::discover(Some(path.as_path())).unwrap();
    assert_eq!(config.data, "https://example.org/tree.json");
    assert_eq!(config.share_origin, "https://precog.example");
    assert_eq!(config.theme, ThemeChoice::Light);
    assert_eq!(config.replay_timings.pause_ms, 500);
    assert_eq!(config.settle_delay_ms, 300);
    assert!(KeyMap::from_bindings(&config.keys).is_ok());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::discover(Some(dir.path().join("missing.json").as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ settle_delay_ms: }").unwrap();

    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_defaults_round_trip_through_json() {
    let config = AppConfig::default().log_file("/tmp/precog-test.log");
    let text = serde_json::to_string(&config).unwrap();
    let back: AppConfig = serde_json::from_str(&text).unwrap();

    assert_eq!(back, config);
    assert_eq!(back.log_path(), std::path::PathBuf::from("/tmp/precog-test.log"));
}
