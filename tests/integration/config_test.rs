use sentinel::core::config::Config;
use sentinel::core::system_monitor::TemperatureUnit;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_invalid_json_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"cpu_threshold": 75, "monitor_temp": false, "check_interval": "soon"}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    let defaults = Config::default();
    assert_eq!(config.cpu_threshold, 75.0);
    assert!(!config.monitor_temp);
    assert_eq!(config.check_interval, defaults.check_interval);
    assert_eq!(config.ram_threshold, defaults.ram_threshold);
}

#[test]
fn test_legacy_file_is_understood() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"temperature_unit": "Fahrenheit (°F)"}"#).unwrap();

    assert_eq!(
        Config::load_from(&path).temperature_unit,
        TemperatureUnit::Fahrenheit
    );
}

#[test]
fn test_save_then_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = Config {
        monitor_disk: false,
        temp_threshold: 70.0,
        temperature_unit: TemperatureUnit::Fahrenheit,
        notification_interval: 300,
        disk_mount: PathBuf::from("/home"),
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_set_field_then_save() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::load_from(&path);
    config.set_field("disk_threshold", "5").unwrap();
    config.set_field("temperature_unit", "fahrenheit").unwrap();
    assert!(config.set_field("ram_threshold", "101").is_err());
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded.disk_threshold, 5.0);
    assert_eq!(loaded.temperature_unit, TemperatureUnit::Fahrenheit);
    assert_eq!(loaded.ram_threshold, Config::default().ram_threshold);
}
