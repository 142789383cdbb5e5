use chrono::{DateTime, Local, Utc};

use crate::core::system_monitor::{Metric, TemperatureUnit};

/// Format a Celsius reading in the configured unit (e.g. "71.3°F")
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.from_celsius(celsius), unit.symbol())
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_gib(value: f64) -> String {
    format!("{:.2} GiB", value)
}

/// Format a stored metric value for display
pub fn format_metric(metric: Metric, value: f64, unit: TemperatureUnit) -> String {
    match metric {
        Metric::Cpu | Metric::Ram => format_percent(value),
        Metric::Temp => format_temperature(value, unit),
        Metric::Disk => format_gib(value),
    }
}

/// Axis title for a metric's series
pub fn axis_title(metric: Metric, unit: TemperatureUnit) -> String {
    match metric {
        Metric::Cpu => "CPU utilisation (%)".to_string(),
        Metric::Ram => "RAM utilisation (%)".to_string(),
        Metric::Temp => format!("Temperature ({})", unit.symbol()),
        Metric::Disk => "Free disk space (GiB)".to_string(),
    }
}

/// Format timestamp in local time (YYYY-MM-DD HH:MM:SS)
pub fn format_time(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}
