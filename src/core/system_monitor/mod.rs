//! System monitoring core functionality.
//!
//! This module samples host metrics, gates threshold alerts per metric and
//! appends every sample to a persisted history.

pub mod alerts;
mod history;
mod metrics;
mod monitor;
pub mod runtime;
mod sampler;

pub use alerts::{Alert, AlertGate, NotificationSink};
pub use history::{FileLogStore, HistoryStore, LogStore, MemoryLogStore};
pub use metrics::{celsius_to_fahrenheit, Comparator, Metric, SampleRecord, TemperatureUnit};
pub use monitor::{MonitorLoop, TickReport};
pub use runtime::{MonitorRuntime, RuntimeHandle};
pub use sampler::{free_space_for, primary_temperature, MetricSampler, SysinfoSampler};
