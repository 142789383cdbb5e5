use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the four host metrics the monitor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Ram,
    Temp,
    Disk,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Cpu, Metric::Ram, Metric::Temp, Metric::Disk];

    /// Key used in the history log and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Ram => "ram",
            Metric::Temp => "temp",
            Metric::Disk => "disk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Ram => "RAM",
            Metric::Temp => "Temperature",
            Metric::Disk => "Disk",
        }
    }

    /// Direction in which a value violates this metric's threshold
    pub fn comparator(&self) -> Comparator {
        match self {
            Metric::Cpu | Metric::Ram | Metric::Temp => Comparator::Above,
            Metric::Disk => Comparator::Below,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "cpu" => Some(Metric::Cpu),
            "ram" | "memory" | "mem" => Some(Metric::Ram),
            "temp" | "temperature" => Some(Metric::Temp),
            "disk" => Some(Metric::Disk),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Threshold comparison direction. Both directions are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Above,
    Below,
}

impl Comparator {
    pub fn violates(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Above => value > threshold,
            Comparator::Below => value < threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Parse the unit names accepted in configuration files, including the
    /// display strings older versions stored ("Celsius (°C)", "°F", ...)
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        if lower.starts_with("celsius") || lower == "°c" || lower == "c" {
            Some(TemperatureUnit::Celsius)
        } else if lower.starts_with("fahrenheit") || lower == "°f" || lower == "f" {
            Some(TemperatureUnit::Fahrenheit)
        } else {
            None
        }
    }

    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("Celsius"),
            TemperatureUnit::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// One timestamped snapshot of the enabled metrics.
///
/// Temperatures are always stored in Celsius; disk is free space in GiB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<f64>,
}

impl SampleRecord {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            cpu: None,
            ram: None,
            temp: None,
            disk: None,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Ram => self.ram,
            Metric::Temp => self.temp,
            Metric::Disk => self.disk,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Ram => &mut self.ram,
            Metric::Temp => &mut self.temp,
            Metric::Disk => &mut self.disk,
        };
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_conversion() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(TemperatureUnit::Celsius.from_celsius(42.5), 42.5);
    }

    #[test]
    fn test_unit_parse_legacy_names() {
        assert_eq!(
            TemperatureUnit::parse("Fahrenheit (°F)"),
            Some(TemperatureUnit::Fahrenheit)
        );
        assert_eq!(TemperatureUnit::parse("°C"), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::parse("kelvin"), None);
    }

    #[test]
    fn test_record_omits_absent_metrics() {
        let mut record = SampleRecord::new(Utc::now());
        record.set(Metric::Cpu, 12.5);
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("cpu"));
        assert!(!object.contains_key("temp"));
        assert!(!object.contains_key("disk"));
    }

    #[test]
    fn test_comparators_are_strict() {
        assert!(!Comparator::Above.violates(90.0, 90.0));
        assert!(!Comparator::Below.violates(1.0, 1.0));
        assert!(Comparator::Above.violates(90.1, 90.0));
        assert!(Comparator::Below.violates(0.5, 1.0));
    }
}
