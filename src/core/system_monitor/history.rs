//! Append-only sample history.
//!
//! Records are stored as JSON Lines, one [`SampleRecord`] per line, on top of a
//! small byte-store abstraction so the policy can be exercised without touching
//! the filesystem.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::metrics::SampleRecord;
use crate::error::{Result, SentinelError};

/// Durable byte storage backing a [`HistoryStore`]
pub trait LogStore: Send {
    /// Whole contents, or `None` when nothing has been stored yet
    fn read_all(&self) -> io::Result<Option<Vec<u8>>>;

    /// Append bytes at the end of the store
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Drop every stored byte
    fn reset(&mut self) -> io::Result<()>;

    /// Keep only the first `len` bytes
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

/// File-backed store; parent directories are created on first write
#[derive(Debug, Clone)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl LogStore for FileLogStore {
    fn read_all(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()
    }

    fn reset(&mut self) -> io::Result<()> {
        self.ensure_parent()?;
        fs::write(&self.path, b"")
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(len)?;
        file.sync_all()
    }
}

/// In-memory store, handy for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryLogStore {
    data: Option<Vec<u8>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(bytes.into()),
        }
    }
}

impl LogStore for MemoryLogStore {
    fn read_all(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.data.clone())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.data.get_or_insert_with(Vec::new).extend_from_slice(bytes);
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.data = Some(Vec::new());
        Ok(())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        if let Some(data) = self.data.as_mut() {
            data.truncate(len as usize);
        }
        Ok(())
    }
}

/// Ordered, append-only log of [`SampleRecord`]s
pub struct HistoryStore<S: LogStore = FileLogStore> {
    store: S,
    verified: bool,
    last_timestamp: Option<DateTime<Utc>>,
}

impl HistoryStore<FileLogStore> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileLogStore::new(path))
    }
}

impl<S: LogStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            verified: false,
            last_timestamp: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every stored record in insertion order; empty if nothing was stored yet
    pub fn load_all(&self) -> Result<Vec<SampleRecord>> {
        match self.store.read_all()? {
            Some(data) => parse_records(&data),
            None => Ok(Vec::new()),
        }
    }

    /// Append one record.
    ///
    /// The first append of a process, and the first one after a failed
    /// write, validates what is already stored. A torn final line is cut off;
    /// a log that is still unreadable is discarded and history starts over.
    /// A timestamp older than the last stored record is clamped to it.
    pub fn append(&mut self, mut record: SampleRecord) -> Result<()> {
        if !self.verified {
            self.verify()?;
        }

        if let Some(last) = self.last_timestamp {
            if record.timestamp < last {
                log::warn!(
                    "Sample timestamp {} precedes last stored {}, clamping",
                    record.timestamp,
                    last
                );
                record.timestamp = last;
            }
        }

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        if let Err(e) = self.store.append(&line) {
            // The write may have left part of the line behind
            self.verified = false;
            return Err(e.into());
        }
        self.last_timestamp = Some(record.timestamp);
        Ok(())
    }

    fn verify(&mut self) -> Result<()> {
        if let Some(data) = self.store.read_all()? {
            let complete = complete_prefix_len(&data);
            if complete < data.len() {
                log::warn!(
                    "Dropping {} byte(s) of a partially written sample",
                    data.len() - complete
                );
                self.store.truncate(complete as u64)?;
            }
        }

        match self.load_all() {
            Ok(records) => {
                self.last_timestamp = records.last().map(|r| r.timestamp);
            }
            Err(SentinelError::StoreCorrupt(reason)) => {
                log::warn!("Discarding unreadable sample history: {}", reason);
                self.store.reset()?;
                self.last_timestamp = None;
            }
            Err(e) => return Err(e),
        }
        self.verified = true;
        Ok(())
    }
}

/// Length of `data` up to and including its last newline
fn complete_prefix_len(data: &[u8]) -> usize {
    data.iter()
        .rposition(|b| *b == b'\n')
        .map(|idx| idx + 1)
        .unwrap_or(0)
}

fn parse_records(data: &[u8]) -> Result<Vec<SampleRecord>> {
    if !data.is_empty() && !data.ends_with(b"\n") {
        return Err(SentinelError::store_corrupt("last record is truncated"));
    }

    let text = std::str::from_utf8(data)
        .map_err(|e| SentinelError::store_corrupt(format!("not valid UTF-8: {}", e)))?;

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                SentinelError::store_corrupt(format!("line {}: {}", idx + 1, e))
            })
        })
        .collect()
}
