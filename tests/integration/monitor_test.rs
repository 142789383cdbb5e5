use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use sentinel::core::config::Config;
use sentinel::core::system_monitor::{
    Alert, FileLogStore, HistoryStore, Metric, MetricSampler, MonitorLoop, NotificationSink,
    TemperatureUnit,
};
use sentinel::{Result, SentinelError};
use tempfile::TempDir;

/// Replays one scripted reading per tick; `None` temperature means the
/// sensor read fails
#[derive(Clone, Copy)]
struct Reading {
    cpu: f64,
    ram: f64,
    temp: Option<f64>,
    disk: f64,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            cpu: 10.0,
            ram: 20.0,
            temp: Some(40.0),
            disk: 100.0,
        }
    }
}

struct Scripted {
    readings: VecDeque<Reading>,
    current: Reading,
}

impl Scripted {
    fn new(readings: impl IntoIterator<Item = Reading>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            current: Reading::default(),
        }
    }
}

impl MetricSampler for Scripted {
    // The loop reads CPU first, so that is where the script advances
    fn read_cpu_percent(&mut self) -> Result<f64> {
        if let Some(next) = self.readings.pop_front() {
            self.current = next;
        }
        Ok(self.current.cpu)
    }

    fn read_ram_percent(&mut self) -> Result<f64> {
        Ok(self.current.ram)
    }

    fn read_primary_temperature(&mut self) -> Result<Option<f64>> {
        self.current
            .temp
            .map(Some)
            .ok_or_else(|| SentinelError::sensor_unavailable("sensor read failed"))
    }

    fn read_free_disk_gib(&mut self, _mount: &Path) -> Result<f64> {
        Ok(self.current.disk)
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Alert>>>);

impl NotificationSink for Recorder {
    fn notify(&self, alert: &Alert) {
        self.0.lock().push(alert.clone());
    }
}

impl Recorder {
    fn titles(&self) -> Vec<String> {
        self.0.lock().iter().map(|a| a.title.clone()).collect()
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
}

fn monitor(
    dir: &TempDir,
    config: Config,
    readings: Vec<Reading>,
    recorder: &Recorder,
) -> MonitorLoop<FileLogStore> {
    MonitorLoop::new(
        config,
        Box::new(Scripted::new(readings)),
        HistoryStore::open(dir.path().join("history.jsonl")),
        Box::new(recorder.clone()),
    )
}

#[test]
fn test_cpu_renotification_scenario() {
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let config = Config {
        cpu_threshold: 90.0,
        notification_interval: 60,
        ..Config::default()
    };
    let hot = |cpu| Reading {
        cpu,
        ..Reading::default()
    };
    let mut monitor = monitor(&dir, config, vec![hot(95.0), hot(96.0), hot(96.0)], &recorder);

    assert_eq!(monitor.tick(at(0)).alerts.len(), 1);
    assert!(monitor.tick(at(30)).alerts.is_empty());
    assert_eq!(monitor.tick(at(61)).alerts.len(), 1);

    assert_eq!(recorder.titles(), vec!["CPU Alert", "CPU Alert"]);
    assert_eq!(monitor.history().load_all().unwrap().len(), 3);
}

#[test]
fn test_disk_below_threshold_scenario() {
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let config = Config {
        disk_threshold: 1.0,
        notification_interval: 1,
        ..Config::default()
    };
    let free = |disk| Reading {
        disk,
        ..Reading::default()
    };
    let mut monitor = monitor(&dir, config, vec![free(0.5), free(1.0), free(1.5)], &recorder);

    assert_eq!(monitor.tick(at(0)).alerts.len(), 1);
    assert!(monitor.tick(at(10)).alerts.is_empty());
    assert!(monitor.tick(at(20)).alerts.is_empty());

    let alerts = recorder.0.lock();
    assert_eq!(alerts[0].title, "Disk Alert");
    assert_eq!(alerts[0].message, "Low free space: 0.50 GiB");
}

#[test]
fn test_temperature_failure_still_persists_sample() {
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let broken = Reading {
        cpu: 33.0,
        ram: 44.0,
        temp: None,
        disk: 55.0,
    };
    let mut monitor = monitor(&dir, Config::default(), vec![broken], &recorder);

    let report = monitor.tick(at(0));
    assert!(report.persisted);
    assert_eq!(report.unavailable, vec![Metric::Temp]);

    let stored = HistoryStore::open(dir.path().join("history.jsonl"))
        .load_all()
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].cpu, Some(33.0));
    assert_eq!(stored[0].ram, Some(44.0));
    assert_eq!(stored[0].temp, None);
    assert_eq!(stored[0].disk, Some(55.0));
}

#[test]
fn test_fahrenheit_only_changes_message() {
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let config = Config {
        temp_threshold: 90.0,
        temperature_unit: TemperatureUnit::Fahrenheit,
        ..Config::default()
    };
    let hot = Reading {
        temp: Some(100.0),
        ..Reading::default()
    };
    let mut monitor = monitor(&dir, config, vec![hot], &recorder);

    let report = monitor.tick(at(0));
    assert_eq!(report.record.temp, Some(100.0));
    assert_eq!(recorder.0.lock()[0].message, "High temperature: 212.0°F");

    let stored = monitor.history().load_all().unwrap();
    assert_eq!(stored[0].temp, Some(100.0));
}

#[test]
fn test_config_update_applies_to_next_tick() {
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let busy = Reading {
        cpu: 80.0,
        ..Reading::default()
    };
    let mut monitor = monitor(&dir, Config::default(), vec![busy, busy], &recorder);

    assert!(monitor.tick(at(0)).alerts.is_empty());

    monitor.update_config(Config {
        cpu_threshold: 70.0,
        ..Config::default()
    });
    assert_eq!(monitor.tick(at(5)).alerts.len(), 1);
}
