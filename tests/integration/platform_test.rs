use sentinel::core::config::Config;
use sentinel::platform::{PowerAction, TouchscreenState};
use tempfile::TempDir;

#[test]
fn test_configured_touchscreen_device_reaches_command_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"touchscreen_device": "14"}"#).unwrap();

    let config = Config::load_from(&path);
    assert_eq!(
        TouchscreenState::Enabled
            .command_for("linux", &config.touchscreen_device)
            .unwrap(),
        vec!["xinput", "enable", "14"]
    );
}

#[test]
fn test_touchscreen_device_set_from_cli_text() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::load_from(&path);
    config.set_field("touchscreen_device", " 11 ").unwrap();
    config.save_to(&path).unwrap();

    let device = Config::load_from(&path).touchscreen_device;
    assert_eq!(
        TouchscreenState::Disabled.command_for("linux", &device).unwrap(),
        vec!["xinput", "disable", "11"]
    );
}

#[test]
fn test_every_cli_action_name_maps_to_a_command() {
    for name in ["sleep", "shutdown", "reboot", "logout"] {
        let action = PowerAction::from_name(name).unwrap();
        assert_eq!(action.to_string(), name);
        assert!(action.command_for("windows").is_ok());
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_alert_text_reaches_desktop_notifier() {
    use sentinel::core::system_monitor::{Alert, Metric, TemperatureUnit};
    use sentinel::platform::notification_command;

    let alert = Alert::new(Metric::Temp, 100.0, 90.0, TemperatureUnit::Fahrenheit);
    let argv = notification_command(&alert.title, &alert.message).unwrap();
    assert_eq!(argv.last().unwrap(), "High temperature: 212.0°F");
    assert!(argv.contains(&"Temperature Alert".to_string()));
}
