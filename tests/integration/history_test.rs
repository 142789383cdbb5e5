use chrono::{Duration, TimeZone, Utc};
use sentinel::core::system_monitor::{HistoryStore, SampleRecord};
use sentinel::SentinelError;
use tempfile::TempDir;

fn record(offset_secs: i64) -> SampleRecord {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut record = SampleRecord::new(base + Duration::seconds(offset_secs));
    record.cpu = Some((offset_secs % 100) as f64);
    record.ram = Some(50.0);
    if offset_secs % 2 == 0 {
        record.temp = Some(45.5);
    }
    record.disk = Some(120.25);
    record
}

fn roundtrip(count: i64) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.jsonl");

    let expected: Vec<SampleRecord> = (0..count).map(record).collect();
    {
        let mut store = HistoryStore::open(&path);
        for r in &expected {
            store.append(r.clone()).unwrap();
        }
    }

    // A fresh handle sees exactly what was written, in order
    let loaded = HistoryStore::open(&path).load_all().unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn test_empty_history() {
    roundtrip(0);
}

#[test]
fn test_single_record() {
    roundtrip(1);
}

#[test]
fn test_thousand_records() {
    roundtrip(1000);
}

#[test]
fn test_appends_across_handles() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.jsonl");

    HistoryStore::open(&path).append(record(0)).unwrap();
    HistoryStore::open(&path).append(record(5)).unwrap();

    let loaded = HistoryStore::open(&path).load_all().unwrap();
    assert_eq!(loaded, vec![record(0), record(5)]);
}

#[test]
fn test_corrupt_file_restarts_history() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.jsonl");
    std::fs::write(&path, b"{\"timestamp\": garbage\n").unwrap();

    let mut store = HistoryStore::open(&path);
    assert!(matches!(store.load_all(), Err(SentinelError::StoreCorrupt(_))));

    store.append(record(1)).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![record(1)]);
}
