//! One-shot reading of every metric.

use anyhow::Result;
use colored::Colorize;

use super::Paths;
use crate::core::system_monitor::{Metric, MetricSampler, SysinfoSampler};
use crate::core::Config;
use crate::ui::formatters::{format_gib, format_percent, format_temperature};

const UNAVAILABLE: &str = "Unavailable";

/// Execute the now command
pub fn execute(paths: &Paths) -> Result<()> {
    let config = paths.load_config();
    let mut sampler = SysinfoSampler::new();

    // CPU usage is a delta between two refreshes
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    println!("{}", "Current readings".cyan().bold());
    for (metric, value) in read_all(&mut sampler, &config) {
        let over = match (metric, &value) {
            (_, Err(_)) => false,
            (m, Ok(reading)) => reading
                .raw
                .map(|v| m.comparator().violates(v, config.threshold(m)))
                .unwrap_or(false),
        };

        let text = match value {
            Ok(reading) => reading.text,
            Err(reason) => {
                log::debug!("{} unavailable: {}", metric.label(), reason);
                UNAVAILABLE.to_string()
            }
        };

        let text = if over { text.red().bold() } else { text.white() };
        println!("  {:<12} {}", format!("{}:", metric.label()), text);
    }

    Ok(())
}

struct Reading {
    raw: Option<f64>,
    text: String,
}

/// Read each metric once, formatted in the configured unit
fn read_all(
    sampler: &mut dyn MetricSampler,
    config: &Config,
) -> Vec<(Metric, std::result::Result<Reading, String>)> {
    let unit = config.temperature_unit;

    Metric::ALL
        .iter()
        .filter(|m| **m != Metric::Temp || config.display_temperature)
        .map(|&metric| {
            let reading = match metric {
                Metric::Cpu => sampler.read_cpu_percent().map(|v| Reading {
                    raw: Some(v),
                    text: format_percent(v),
                }),
                Metric::Ram => sampler.read_ram_percent().map(|v| Reading {
                    raw: Some(v),
                    text: format_percent(v),
                }),
                Metric::Temp => sampler.read_primary_temperature().map(|v| Reading {
                    raw: v,
                    text: v
                        .map(|c| format_temperature(c, unit))
                        .unwrap_or_else(|| UNAVAILABLE.to_string()),
                }),
                Metric::Disk => sampler.read_free_disk_gib(&config.disk_mount).map(|v| Reading {
                    raw: Some(v),
                    text: format_gib(v),
                }),
            };
            (metric, reading.map_err(|e| e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::TemperatureUnit;
    use crate::error::{Result, SentinelError};
    use std::path::Path;

    struct Fixed {
        temp: Option<f64>,
    }

    impl MetricSampler for Fixed {
        fn read_cpu_percent(&mut self) -> Result<f64> {
            Ok(12.5)
        }
        fn read_ram_percent(&mut self) -> Result<f64> {
            Ok(40.0)
        }
        fn read_primary_temperature(&mut self) -> Result<Option<f64>> {
            Ok(self.temp)
        }
        fn read_free_disk_gib(&mut self, _mount: &Path) -> Result<f64> {
            Err(SentinelError::sensor_unavailable("no disk"))
        }
    }

    fn texts(readings: Vec<(Metric, std::result::Result<Reading, String>)>) -> Vec<String> {
        readings
            .into_iter()
            .map(|(_, r)| r.map(|r| r.text).unwrap_or_else(|_| UNAVAILABLE.to_string()))
            .collect()
    }

    #[test]
    fn test_read_all_formats_in_configured_unit() {
        let config = Config {
            temperature_unit: TemperatureUnit::Fahrenheit,
            ..Config::default()
        };
        let readings = read_all(&mut Fixed { temp: Some(100.0) }, &config);
        assert_eq!(texts(readings), vec!["12.5%", "40.0%", "212.0°F", UNAVAILABLE]);
    }

    #[test]
    fn test_missing_temperature_is_unavailable() {
        let readings = read_all(&mut Fixed { temp: None }, &Config::default());
        assert_eq!(texts(readings)[2], UNAVAILABLE);
    }

    #[test]
    fn test_temperature_hidden_when_display_disabled() {
        let config = Config {
            display_temperature: false,
            ..Config::default()
        };
        let readings = read_all(&mut Fixed { temp: Some(50.0) }, &config);
        assert!(readings.iter().all(|(m, _)| *m != Metric::Temp));
    }
}
