use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::system_monitor::{Metric, TemperatureUnit};
use crate::error::{Result, SentinelError};

pub const CONFIG_ENV: &str = "SENTINEL_CONFIG";
pub const HISTORY_ENV: &str = "SENTINEL_HISTORY";

const PERCENT_RANGE: (f64, f64) = (1.0, 100.0);
const TEMP_RANGE: (f64, f64) = (1.0, 150.0);
const DISK_RANGE: (f64, f64) = (1.0, 1000.0);
const INTERVAL_RANGE: (u64, u64) = (1, 3600);

/// Keys written by older releases, mapped to their current names
const LEGACY_KEYS: [(&str, &str); 4] = [
    ("cpu_usage_threshold", "cpu_threshold"),
    ("ram_usage_threshold", "ram_threshold"),
    ("disk_space_threshold", "disk_threshold"),
    ("temp_unit", "temperature_unit"),
];

/// Monitoring configuration.
///
/// Thresholds: CPU/RAM in percent, temperature in degrees Celsius, disk in
/// GiB of free space. Intervals are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub monitor_cpu: bool,
    pub monitor_ram: bool,
    pub monitor_temp: bool,
    pub monitor_disk: bool,
    pub cpu_threshold: f64,
    pub ram_threshold: f64,
    pub temp_threshold: f64,
    pub disk_threshold: f64,
    pub temperature_unit: TemperatureUnit,
    pub check_interval: u64,
    pub notification_interval: u64,
    /// Whether the current-info view shows the temperature
    pub display_temperature: bool,
    /// Volume whose free space is sampled
    pub disk_mount: PathBuf,
    /// xinput device id toggled by `sentinel touchscreen`
    pub touchscreen_device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor_cpu: true,
            monitor_ram: true,
            monitor_temp: true,
            monitor_disk: true,
            cpu_threshold: 90.0,
            ram_threshold: 90.0,
            temp_threshold: 90.0,
            disk_threshold: 1.0,
            temperature_unit: TemperatureUnit::Celsius,
            check_interval: 5,
            notification_interval: 60,
            display_temperature: true,
            disk_mount: default_disk_mount(),
            touchscreen_device: "9".to_string(),
        }
    }
}

#[cfg(windows)]
fn default_disk_mount() -> PathBuf {
    PathBuf::from("C:\\")
}

#[cfg(not(windows))]
fn default_disk_mount() -> PathBuf {
    PathBuf::from("/")
}

impl Config {
    /// Load from the default location (see [`Config::default_path`])
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::default_path()?))
    }

    /// Load from `path`. Never fails: a missing or unreadable file gives the
    /// defaults, and each bad field falls back to its own default.
    pub fn load_from(path: &Path) -> Self {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                log::warn!("Failed to read config {:?}: {}, using defaults", path, e);
                return Config::default();
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Config::default();
        }

        match serde_json::from_slice::<Value>(&data) {
            Ok(Value::Object(map)) => Self::from_map(&map),
            Ok(_) => {
                log::warn!("Config {:?} is not a JSON object, using defaults", path);
                Config::default()
            }
            Err(e) => {
                log::warn!("Config {:?} is not valid JSON ({}), using defaults", path, e);
                Config::default()
            }
        }
    }

    /// Build a config from a JSON object, field by field
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut map = map.clone();
        for (legacy, current) in LEGACY_KEYS {
            if !map.contains_key(current) {
                if let Some(value) = map.get(legacy).cloned() {
                    map.insert(current.to_string(), value);
                }
            }
        }

        let defaults = Config::default();
        let fields = FieldReader { map: &map };

        Self {
            monitor_cpu: fields.read("monitor_cpu", defaults.monitor_cpu),
            monitor_ram: fields.read("monitor_ram", defaults.monitor_ram),
            monitor_temp: fields.read("monitor_temp", defaults.monitor_temp),
            monitor_disk: fields.read("monitor_disk", defaults.monitor_disk),
            cpu_threshold: fields.read_ranged("cpu_threshold", defaults.cpu_threshold, PERCENT_RANGE),
            ram_threshold: fields.read_ranged("ram_threshold", defaults.ram_threshold, PERCENT_RANGE),
            temp_threshold: fields.read_ranged("temp_threshold", defaults.temp_threshold, TEMP_RANGE),
            disk_threshold: fields.read_ranged("disk_threshold", defaults.disk_threshold, DISK_RANGE),
            temperature_unit: fields.read_unit(defaults.temperature_unit),
            check_interval: fields.read_ranged(
                "check_interval",
                defaults.check_interval,
                INTERVAL_RANGE,
            ),
            notification_interval: fields.read_ranged(
                "notification_interval",
                defaults.notification_interval,
                INTERVAL_RANGE,
            ),
            display_temperature: fields.read("display_temperature", defaults.display_temperature),
            disk_mount: fields.read("disk_mount", defaults.disk_mount),
            touchscreen_device: fields.read("touchscreen_device", defaults.touchscreen_device),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// `$SENTINEL_CONFIG`, or `<config dir>/sentinel/config.json`
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SentinelError::config("Could not determine config directory"))?;
        Ok(config_dir.join("sentinel").join("config.json"))
    }

    /// `$SENTINEL_HISTORY`, or `<data dir>/sentinel/history.jsonl`
    pub fn default_history_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(HISTORY_ENV) {
            return Ok(PathBuf::from(path));
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SentinelError::config("Could not determine data directory"))?;
        Ok(data_dir.join("sentinel").join("history.jsonl"))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.notification_interval)
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        match metric {
            Metric::Cpu => self.monitor_cpu,
            Metric::Ram => self.monitor_ram,
            Metric::Temp => self.monitor_temp,
            Metric::Disk => self.monitor_disk,
        }
    }

    pub fn threshold(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cpu => self.cpu_threshold,
            Metric::Ram => self.ram_threshold,
            Metric::Temp => self.temp_threshold,
            Metric::Disk => self.disk_threshold,
        }
    }

    /// Set a single field from its textual form. Invalid input leaves the
    /// config untouched.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || SentinelError::config(format!("Invalid value '{}' for {}", value, key));

        match key {
            "monitor_cpu" | "monitor_ram" | "monitor_temp" | "monitor_disk"
            | "display_temperature" => {
                let flag = parse_bool(value).ok_or_else(invalid)?;
                match key {
                    "monitor_cpu" => self.monitor_cpu = flag,
                    "monitor_ram" => self.monitor_ram = flag,
                    "monitor_temp" => self.monitor_temp = flag,
                    "monitor_disk" => self.monitor_disk = flag,
                    _ => self.display_temperature = flag,
                }
            }
            "cpu_threshold" | "ram_threshold" | "temp_threshold" | "disk_threshold" => {
                let range = match key {
                    "temp_threshold" => TEMP_RANGE,
                    "disk_threshold" => DISK_RANGE,
                    _ => PERCENT_RANGE,
                };
                let number: f64 = value.trim().parse().map_err(|_| invalid())?;
                if !number.in_range(range) {
                    return Err(out_of_range(key, range));
                }
                match key {
                    "cpu_threshold" => self.cpu_threshold = number,
                    "ram_threshold" => self.ram_threshold = number,
                    "temp_threshold" => self.temp_threshold = number,
                    _ => self.disk_threshold = number,
                }
            }
            "check_interval" | "notification_interval" => {
                let secs: u64 = value.trim().parse().map_err(|_| invalid())?;
                if !secs.in_range(INTERVAL_RANGE) {
                    return Err(out_of_range(key, INTERVAL_RANGE));
                }
                if key == "check_interval" {
                    self.check_interval = secs;
                } else {
                    self.notification_interval = secs;
                }
            }
            "temperature_unit" => {
                self.temperature_unit = TemperatureUnit::parse(value).ok_or_else(invalid)?;
            }
            "disk_mount" => {
                if value.trim().is_empty() {
                    return Err(invalid());
                }
                self.disk_mount = PathBuf::from(value.trim());
            }
            "touchscreen_device" => {
                if value.trim().is_empty() {
                    return Err(invalid());
                }
                self.touchscreen_device = value.trim().to_string();
            }
            _ => {
                return Err(SentinelError::config(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn out_of_range<T: std::fmt::Display>(key: &str, (min, max): (T, T)) -> SentinelError {
    SentinelError::config(format!("{} must be between {} and {}", key, min, max))
}

trait InRange: PartialOrd + Sized {
    fn in_range(&self, (min, max): (Self, Self)) -> bool {
        *self >= min && *self <= max
    }
}

impl InRange for f64 {}
impl InRange for u64 {}

struct FieldReader<'a> {
    map: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.map.get(key) {
            None => default,
            Some(value) => match T::deserialize(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("Config field '{}' is invalid ({}), using default", key, e);
                    default
                }
            },
        }
    }

    fn read_ranged<T>(&self, key: &str, default: T, range: (T, T)) -> T
    where
        T: DeserializeOwned + InRange + Copy + std::fmt::Display,
    {
        let value = self.read(key, default);
        if value.in_range(range) {
            value
        } else {
            log::warn!(
                "Config field '{}' = {} is outside {}..={}, using default {}",
                key,
                value,
                range.0,
                range.1,
                default
            );
            default
        }
    }

    fn read_unit(&self, default: TemperatureUnit) -> TemperatureUnit {
        match self.map.get("temperature_unit") {
            None => default,
            Some(Value::String(text)) => TemperatureUnit::parse(text).unwrap_or_else(|| {
                log::warn!("Unknown temperature unit '{}', using {}", text, default);
                default
            }),
            Some(other) => {
                log::warn!("Config field 'temperature_unit' is invalid ({}), using default", other);
                default
            }
        }
    }
}
