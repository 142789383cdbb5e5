use std::path::{Path, PathBuf};

use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::error::{Result, SentinelError};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Point-in-time readings of the monitored metrics.
///
/// Each read fails independently; a missing sensor never aborts the others.
/// Temperatures are always returned in Celsius.
pub trait MetricSampler: Send {
    /// CPU utilisation since the previous read, 0-100
    fn read_cpu_percent(&mut self) -> Result<f64>;

    /// Memory utilisation, 0-100
    fn read_ram_percent(&mut self) -> Result<f64>;

    /// Reading of the primary temperature sensor, `None` without sensors
    fn read_primary_temperature(&mut self) -> Result<Option<f64>>;

    /// Free space in GiB on the volume holding `mount`
    fn read_free_disk_gib(&mut self, mount: &Path) -> Result<f64>;
}

/// Sampler backed by `sysinfo`
pub struct SysinfoSampler {
    system: System,
    components: Components,
    disks: Disks,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        // First CPU refresh establishes the baseline the next read diffs against
        let system = System::new_with_specifics(refresh_kind);

        Self {
            system,
            components: Components::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSampler for SysinfoSampler {
    fn read_cpu_percent(&mut self) -> Result<f64> {
        self.system.refresh_cpu_usage();
        if self.system.cpus().is_empty() {
            return Err(SentinelError::sensor_unavailable("no CPU reported"));
        }
        Ok(f64::from(self.system.global_cpu_usage()).clamp(0.0, 100.0))
    }

    fn read_ram_percent(&mut self) -> Result<f64> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(SentinelError::sensor_unavailable("total memory reported as zero"));
        }
        let used = self.system.used_memory();
        Ok((used as f64 / total as f64) * 100.0)
    }

    fn read_primary_temperature(&mut self) -> Result<Option<f64>> {
        self.components.refresh(true);
        let readings = self
            .components
            .iter()
            .map(|comp| (comp.label().to_string(), comp.temperature()));
        Ok(primary_temperature(readings))
    }

    fn read_free_disk_gib(&mut self, mount: &Path) -> Result<f64> {
        self.disks.refresh(true);
        let volumes: Vec<(PathBuf, u64)> = self
            .disks
            .iter()
            .map(|disk| (disk.mount_point().to_path_buf(), disk.available_space()))
            .collect();

        free_space_for(&volumes, mount)
            .map(|bytes| bytes as f64 / BYTES_PER_GIB)
            .ok_or_else(|| {
                SentinelError::sensor_unavailable(format!(
                    "no mounted volume contains {}",
                    mount.display()
                ))
            })
    }
}

/// Pick the primary sensor reading.
///
/// Sensors are ordered by label (lexicographically) and the first one with a
/// finite reading wins, so the choice does not depend on the order the host
/// enumerates them in.
pub fn primary_temperature<I>(readings: I) -> Option<f64>
where
    I: IntoIterator<Item = (String, Option<f32>)>,
{
    let mut readings: Vec<(String, f32)> = readings
        .into_iter()
        .filter_map(|(label, temp)| temp.filter(|t| t.is_finite()).map(|t| (label, t)))
        .collect();
    readings.sort_by(|a, b| a.0.cmp(&b.0));
    readings.first().map(|(_, temp)| f64::from(*temp))
}

/// Available bytes on the volume whose mount point is the longest prefix of
/// `target`
pub fn free_space_for(volumes: &[(PathBuf, u64)], target: &Path) -> Option<u64> {
    volumes
        .iter()
        .filter(|(mount_point, _)| target.starts_with(mount_point))
        .max_by_key(|(mount_point, _)| mount_point.components().count())
        .map(|(_, available)| *available)
}
