//! One monitoring cycle: sample, gate, notify, persist.

use chrono::{DateTime, Utc};

use super::alerts::{Alert, AlertGate, NotificationSink};
use super::history::{HistoryStore, LogStore};
use super::metrics::{Metric, SampleRecord};
use super::sampler::MetricSampler;
use crate::core::config::Config;
use crate::error::Result;

/// Outcome of a single tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub record: SampleRecord,
    pub alerts: Vec<Alert>,
    /// Metrics that were enabled but could not be read this tick
    pub unavailable: Vec<Metric>,
    pub persisted: bool,
}

/// Explicit monitoring state: the configuration snapshot, alert state and
/// collaborators. Constructed once and driven by whatever schedules ticks.
pub struct MonitorLoop<S: LogStore> {
    config: Config,
    sampler: Box<dyn MetricSampler>,
    gate: AlertGate,
    history: HistoryStore<S>,
    notifier: Box<dyn NotificationSink>,
}

impl<S: LogStore> MonitorLoop<S> {
    pub fn new(
        config: Config,
        sampler: Box<dyn MetricSampler>,
        history: HistoryStore<S>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            sampler,
            gate: AlertGate::new(),
            history,
            notifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration wholesale; used from the next tick on
    pub fn update_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn gate(&self) -> &AlertGate {
        &self.gate
    }

    /// Run one cycle at `now`.
    ///
    /// Every enabled metric is handled independently; an unreadable sensor is
    /// left out of the record and skipped for alerting. The record is always
    /// appended, and a failing append is logged rather than returned.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut record = SampleRecord::new(now);
        let mut alerts = Vec::new();
        let mut unavailable = Vec::new();

        for metric in Metric::ALL {
            if !self.config.is_enabled(metric) {
                continue;
            }

            let value = match self.sample(metric) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    log::debug!("{} unavailable this tick", metric.label());
                    unavailable.push(metric);
                    continue;
                }
                Err(e) => {
                    log::debug!("{} unavailable this tick: {}", metric.label(), e);
                    unavailable.push(metric);
                    continue;
                }
            };

            record.set(metric, value);

            let threshold = self.config.threshold(metric);
            if self.gate.should_alert(
                metric,
                value,
                threshold,
                metric.comparator(),
                now,
                self.config.notification_interval(),
            ) {
                let alert = Alert::new(metric, value, threshold, self.config.temperature_unit);
                self.notifier.notify(&alert);
                alerts.push(alert);
            }
        }

        let persisted = match self.history.append(record.clone()) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to append sample to history: {}", e);
                false
            }
        };

        TickReport {
            record,
            alerts,
            unavailable,
            persisted,
        }
    }

    fn sample(&mut self, metric: Metric) -> Result<Option<f64>> {
        match metric {
            Metric::Cpu => self.sampler.read_cpu_percent().map(Some),
            Metric::Ram => self.sampler.read_ram_percent().map(Some),
            Metric::Temp => self.sampler.read_primary_temperature(),
            Metric::Disk => {
                let mount = self.config.disk_mount.clone();
                self.sampler.read_free_disk_gib(&mount).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::MemoryLogStore;
    use crate::error::SentinelError;
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::Arc;

    #[derive(Default)]
    struct FixedSampler {
        cpu: f64,
        ram: f64,
        temp: Option<f64>,
        disk: f64,
    }

    impl MetricSampler for FixedSampler {
        fn read_cpu_percent(&mut self) -> Result<f64> {
            Ok(self.cpu)
        }
        fn read_ram_percent(&mut self) -> Result<f64> {
            Ok(self.ram)
        }
        fn read_primary_temperature(&mut self) -> Result<Option<f64>> {
            Ok(self.temp)
        }
        fn read_free_disk_gib(&mut self, _mount: &Path) -> Result<f64> {
            Ok(self.disk)
        }
    }

    struct BrokenTemperature(FixedSampler);

    impl MetricSampler for BrokenTemperature {
        fn read_cpu_percent(&mut self) -> Result<f64> {
            self.0.read_cpu_percent()
        }
        fn read_ram_percent(&mut self) -> Result<f64> {
            self.0.read_ram_percent()
        }
        fn read_primary_temperature(&mut self) -> Result<Option<f64>> {
            Err(SentinelError::sensor_unavailable("sensor read timed out"))
        }
        fn read_free_disk_gib(&mut self, mount: &Path) -> Result<f64> {
            self.0.read_free_disk_gib(mount)
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Alert>>>);

    impl NotificationSink for Recorder {
        fn notify(&self, alert: &Alert) {
            self.0.lock().push(alert.clone());
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn monitor(sampler: impl MetricSampler + 'static, recorder: &Recorder) -> MonitorLoop<MemoryLogStore> {
        MonitorLoop::new(
            Config::default(),
            Box::new(sampler),
            HistoryStore::new(MemoryLogStore::new()),
            Box::new(recorder.clone()),
        )
    }

    #[test]
    fn test_quiet_tick_records_all_metrics() {
        let recorder = Recorder::default();
        let sampler = FixedSampler {
            cpu: 10.0,
            ram: 20.0,
            temp: Some(40.0),
            disk: 100.0,
        };
        let mut monitor = monitor(sampler, &recorder);

        let report = monitor.tick(at(0));
        assert!(report.alerts.is_empty());
        assert!(report.persisted);
        assert_eq!(report.record.cpu, Some(10.0));
        assert_eq!(report.record.temp, Some(40.0));
        assert_eq!(report.record.disk, Some(100.0));
        assert_eq!(monitor.history().load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_temperature_keeps_other_metrics() {
        let recorder = Recorder::default();
        let sampler = BrokenTemperature(FixedSampler {
            cpu: 95.0,
            ram: 30.0,
            temp: None,
            disk: 50.0,
        });
        let mut monitor = monitor(sampler, &recorder);

        let report = monitor.tick(at(0));
        assert_eq!(report.unavailable, vec![Metric::Temp]);
        assert_eq!(report.alerts.len(), 1);

        let stored = monitor.history().load_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].cpu, Some(95.0));
        assert_eq!(stored[0].ram, Some(30.0));
        assert_eq!(stored[0].disk, Some(50.0));
        assert_eq!(stored[0].temp, None);
    }

    #[test]
    fn test_disabled_metrics_are_not_sampled() {
        let recorder = Recorder::default();
        let sampler = FixedSampler {
            cpu: 99.0,
            ram: 99.0,
            temp: Some(99.0),
            disk: 0.1,
        };
        let mut monitor = monitor(sampler, &recorder);
        let mut config = Config::default();
        config.monitor_cpu = false;
        config.monitor_disk = false;
        monitor.update_config(config);

        let report = monitor.tick(at(0));
        assert_eq!(report.record.cpu, None);
        assert_eq!(report.record.disk, None);
        let fired: Vec<_> = report.alerts.iter().map(|a| a.metric).collect();
        assert_eq!(fired, vec![Metric::Ram, Metric::Temp]);
    }

    #[test]
    fn test_alerts_respect_renotification_interval() {
        let recorder = Recorder::default();
        let sampler = FixedSampler {
            cpu: 95.0,
            ram: 10.0,
            temp: Some(30.0),
            disk: 0.5,
        };
        let mut monitor = monitor(sampler, &recorder);

        assert_eq!(monitor.tick(at(0)).alerts.len(), 2);
        assert!(monitor.tick(at(30)).alerts.is_empty());
        assert_eq!(monitor.tick(at(61)).alerts.len(), 2);

        let delivered = recorder.0.lock();
        assert_eq!(delivered.len(), 4);
        assert_eq!(delivered[0].title, "CPU Alert");
        assert_eq!(delivered[1].title, "Disk Alert");
        assert_eq!(monitor.history().load_all().unwrap().len(), 3);
    }
}
