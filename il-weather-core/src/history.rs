//! Persisted log of past lookups, newest first.
//!
//! The whole log lives in a single slot as a JSON array. A missing or
//! malformed slot reads as an empty history.

use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::model::HistoryEntry;

/// Maximum number of entries kept.
pub const HISTORY_CAP: usize = 50;

pub trait HistoryStore: Send + Sync + Debug {
    /// Insert `entry` at the front, dropping the oldest entries past [`HISTORY_CAP`].
    fn append(&self, entry: HistoryEntry) -> Result<()>;

    /// Stored entries, most recent first.
    fn read_all(&self) -> Vec<HistoryEntry>;

    /// Remove the whole log.
    fn clear(&self) -> Result<()>;
}

/// Clear `store` only if `confirm` agrees. Returns whether the log was erased.
pub fn clear_confirmed<F>(store: &dyn HistoryStore, confirm: F) -> Result<bool>
where
    F: FnOnce() -> bool,
{
    if !confirm() {
        return Ok(false);
    }
    store.clear()?;
    Ok(true)
}

fn decode(raw: &str) -> Vec<HistoryEntry> {
    match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "stored history is malformed, treating as empty");
            Vec::new()
        }
    }
}

fn prepend_capped(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    entries.insert(0, entry);
    entries.truncate(HISTORY_CAP);
}

/// History kept in a JSON file.
#[derive(Debug)]
pub struct FileHistoryStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    writer: Mutex<()>,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), writer: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read history file");
                None
            }
        }
    }

    fn write_entries(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(entries).context("Failed to serialize history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }
}

impl HistoryStore for FileHistoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.writer.lock();
        let mut entries = self.read_all();
        prepend_capped(&mut entries, entry);
        self.write_entries(&entries)
    }

    fn read_all(&self) -> Vec<HistoryEntry> {
        self.read_raw().map(|raw| decode(&raw)).unwrap_or_default()
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.writer.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove history file: {}", self.path.display())),
        }
    }
}

/// History kept in memory, stored serialized like the file slot.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw slot value, which need not be valid.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(raw.into())) }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut slot = self.slot.lock();
        let mut entries = slot.as_deref().map(decode).unwrap_or_default();
        prepend_capped(&mut entries, entry);
        *slot = Some(serde_json::to_string(&entries).context("Failed to serialize history")?);
        Ok(())
    }

    fn read_all(&self) -> Vec<HistoryEntry> {
        self.slot.lock().as_deref().map(decode).unwrap_or_default()
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            resolver_key: format!("Town {n}"),
            display_name: format!("עיר {n}"),
            temperature_c: Some(n as f64),
            condition: Some("Sunny".into()),
            timestamp: format!("1.1.2026, 10:00:{:02}", n % 60),
            country: Some("Israel".into()),
        }
    }

    fn keys(entries: &[HistoryEntry]) -> Vec<String> {
        entries.iter().map(|e| e.resolver_key.clone()).collect()
    }

    #[test]
    fn append_puts_newest_first() {
        let store = MemoryHistoryStore::new();
        store.append(entry(1)).unwrap();
        store.append(entry(2)).unwrap();

        assert_eq!(keys(&store.read_all()), vec!["Town 2", "Town 1"]);
    }

    #[test]
    fn fifty_one_appends_keep_the_fifty_most_recent() {
        let store = MemoryHistoryStore::new();
        for n in 1..=51 {
            store.append(entry(n)).unwrap();
        }

        let entries = store.read_all();
        assert_eq!(entries.len(), HISTORY_CAP);
        assert_eq!(entries[0].resolver_key, "Town 51");
        assert_eq!(entries[49].resolver_key, "Town 2");
    }

    #[test]
    fn append_to_full_log_evicts_previous_oldest() {
        let store = MemoryHistoryStore::new();
        for n in 1..=50 {
            store.append(entry(n)).unwrap();
        }
        let before = store.read_all();
        assert_eq!(before[49].resolver_key, "Town 1");

        store.append(entry(99)).unwrap();

        let after = store.read_all();
        assert_eq!(after.len(), 50);
        assert_eq!(after[0].resolver_key, "Town 99");
        assert_eq!(&after[1..], &before[..49]);
    }

    #[test]
    fn malformed_slot_reads_as_empty() {
        let store = MemoryHistoryStore::with_raw("{not json");
        assert!(store.read_all().is_empty());

        let store = MemoryHistoryStore::with_raw(r#"{"settlement":"Eilat"}"#);
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn append_over_malformed_slot_starts_fresh() {
        let store = MemoryHistoryStore::with_raw("garbage");
        store.append(entry(1)).unwrap();

        assert_eq!(keys(&store.read_all()), vec!["Town 1"]);
    }

    #[test]
    fn denied_confirmation_keeps_history() {
        let store = MemoryHistoryStore::new();
        store.append(entry(1)).unwrap();
        let before = store.raw();

        let cleared = clear_confirmed(&store, || false).unwrap();

        assert!(!cleared);
        assert_eq!(store.raw(), before);
    }

    #[test]
    fn granted_confirmation_empties_history() {
        let store = MemoryHistoryStore::new();
        store.append(entry(1)).unwrap();

        let cleared = clear_confirmed(&store, || true).unwrap();

        assert!(cleared);
        assert_eq!(store.raw(), None);
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.json");

        FileHistoryStore::new(&path).append(entry(1)).unwrap();
        FileHistoryStore::new(&path).append(entry(2)).unwrap();

        let store = FileHistoryStore::new(&path);
        assert_eq!(keys(&store.read_all()), vec!["Town 2", "Town 1"]);
    }

    #[test]
    fn file_store_missing_or_malformed_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::new(&path);

        assert!(store.read_all().is_empty());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn file_store_clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::new(&path);

        store.append(entry(1)).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();
    }

    #[test]
    fn file_store_reads_browser_written_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(
            &path,
            r#"[{"settlement":"Haifa","hebrewName":"חיפה","temperature":18.2,"condition":"Mist","timestamp":"2.2.2026, 08:15:00","country":"Israel"}]"#,
        )
        .unwrap();

        let entries = FileHistoryStore::new(&path).read_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "חיפה");
        assert_eq!(entries[0].temperature_c, Some(18.2));
    }
}
