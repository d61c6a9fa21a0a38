//! Event store backed by a single JSON file
//!
//! Every append rewrites the whole array: read, push, write to a sibling temp
//! file, rename over the original. Readers therefore see either the previous
//! or the next complete log. Appends through one store are serialized by an
//! async mutex so concurrent callers cannot lose each other's records.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use leadlog_core::Event;

use crate::PersistenceError;

/// Append-only event log
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events in arrival order
    ///
    /// Never fails: a missing or unreadable log reads as empty.
    async fn load(&self) -> Vec<Event>;

    /// Durably add one event at the end of the log
    async fn append(&self, event: &Event) -> Result<(), PersistenceError>;
}

/// Result of reading the backing file
enum LogRead {
    Missing,
    Parsed(Vec<Event>),
    /// File read fine but does not match the event schema
    Corrupt(serde_json::Error),
    /// File exists but could not be read
    Unreadable(std::io::Error),
}

/// JSON array file store
pub struct JsonFileEventStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_log(&self) -> LogRead {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return LogRead::Missing,
            Err(e) => return LogRead::Unreadable(e),
        };

        match serde_json::from_slice::<Vec<Event>>(&bytes) {
            Ok(events) => LogRead::Parsed(events),
            Err(e) => LogRead::Corrupt(e),
        }
    }

    async fn write_log(&self, events: &[Event]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::io(parent, e))?;
        }

        let payload = to_pretty_json(events)?;
        let tmp_path = self.temp_path();

        if let Err(e) = write_synced(&tmp_path, &payload).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PersistenceError::io(&tmp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PersistenceError::io(&self.path, e));
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self.path.file_name().unwrap_or_default().to_string_lossy();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
    }

    /// Fresh `<file>.corrupt-<uuid>` name so earlier backups are never replaced
    fn corrupt_backup_path(&self) -> PathBuf {
        let name = self.path.file_name().unwrap_or_default().to_string_lossy();
        self.path
            .with_file_name(format!("{}.corrupt-{}", name, uuid::Uuid::new_v4().simple()))
    }

    async fn backup_corrupt(&self) {
        let backup = self.corrupt_backup_path();
        match tokio::fs::rename(&self.path, &backup).await {
            Ok(()) => tracing::warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                "Moved corrupt event log aside before rewriting"
            ),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Could not back up corrupt event log; it will be overwritten"
            ),
        }
    }
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    async fn load(&self) -> Vec<Event> {
        match self.read_log().await {
            LogRead::Missing => Vec::new(),
            LogRead::Parsed(events) => events,
            LogRead::Corrupt(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Event log is corrupt, treating as empty"
                );
                Vec::new()
            }
            LogRead::Unreadable(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Event log is unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn append(&self, event: &Event) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut events = match self.read_log().await {
            LogRead::Missing => Vec::new(),
            LogRead::Parsed(events) => events,
            LogRead::Corrupt(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Event log is corrupt, starting a new log"
                );
                self.backup_corrupt().await;
                Vec::new()
            }
            // Overwriting a log we could not read would destroy it
            LogRead::Unreadable(e) => return Err(PersistenceError::io(&self.path, e)),
        };

        events.push(event.clone());
        self.write_log(&events).await?;

        tracing::debug!(path = %self.path.display(), total = events.len(), "Event appended");
        Ok(())
    }
}

/// Four-space indented JSON array
fn to_pretty_json(events: &[Event]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    events.serialize(&mut serializer)?;
    Ok(buf)
}

async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.sync_all().await
}

/// Volatile store
#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    async fn append(&self, event: &Event) -> Result<(), PersistenceError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use leadlog_core::{Intent, LeadScore, Sentiment};

    fn sample_event(i: u32) -> Event {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, i % 60).unwrap();
        Event::new(
            &at,
            format!("message {}", i),
            Intent::Pricing,
            Sentiment::Neutral,
            LeadScore::clamped(75),
        )
    }

    fn backups(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("data.json.corrupt-")
            })
            .collect();
        found.sort();
        found
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEventStore::new(dir.path().join("data.json"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEventStore::new(dir.path().join("data.json"));

        let written: Vec<Event> = (0..5).map(sample_event).collect();
        for event in &written {
            store.append(event).await.unwrap();
        }

        // A fresh store instance reads the same file
        let reopened = JsonFileEventStore::new(dir.path().join("data.json"));
        assert_eq!(reopened.load().await, written);
    }

    #[tokio::test]
    async fn test_file_is_indented_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileEventStore::new(&path);
        store.append(&sample_event(1)).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"timestamp\""));
        assert!(text.contains("\"lead_score\": 75"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty_and_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "[{\"timestamp\": ").unwrap();

        let store = JsonFileEventStore::new(&path);
        assert!(store.load().await.is_empty());

        store.append(&sample_event(2)).await.unwrap();
        assert_eq!(store.load().await.len(), 1);

        let backups = backups(dir.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "[{\"timestamp\": ");
    }

    #[tokio::test]
    async fn test_repeated_corruption_keeps_every_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileEventStore::new(&path);

        std::fs::write(&path, "first broken log").unwrap();
        store.append(&sample_event(1)).await.unwrap();
        std::fs::write(&path, "second broken log").unwrap();
        store.append(&sample_event(2)).await.unwrap();

        let mut contents: Vec<String> = backups(dir.path())
            .iter()
            .map(|backup| std::fs::read_to_string(backup).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["first broken log", "second broken log"]);
        assert_eq!(store.load().await, vec![sample_event(2)]);
    }

    #[tokio::test]
    async fn test_schema_violation_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"timestamp": "t", "message": "m", "intent": "pricing",
                 "sentiment": "neutral", "lead_score": 140,
                 "recommended_action": "x"}]"#,
        )
        .unwrap();

        let store = JsonFileEventStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_action_inconsistent_with_score_counts_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let tampered = r#"[{"timestamp": "2024-05-01 09:00:00.000000", "message": "pricing?",
                 "intent": "pricing", "sentiment": "neutral", "lead_score": 75,
                 "recommended_action": "Delete this customer"}]"#;
        std::fs::write(&path, tampered).unwrap();

        let store = JsonFileEventStore::new(&path);
        assert!(store.load().await.is_empty());

        store.append(&sample_event(1)).await.unwrap();
        assert_eq!(store.load().await, vec![sample_event(1)]);
        let backups = backups(dir.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), tampered);
    }

    #[tokio::test]
    async fn test_empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "").unwrap();

        let store = JsonFileEventStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("data.json");
        let store = JsonFileEventStore::new(&path);

        store.append(&sample_event(3)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unreadable_log_fails_append_without_touching_it() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the log file should be cannot be read as a file
        let path = dir.path().join("data.json");
        std::fs::create_dir(&path).unwrap();

        let store = JsonFileEventStore::new(&path);
        assert!(store.load().await.is_empty());

        let err = store.append(&sample_event(4)).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
        assert!(path.is_dir());
        assert!(backups(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileEventStore::new(dir.path().join("data.json"));
        for i in 0..3 {
            store.append(&sample_event(i)).await.unwrap();
        }

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["data.json".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileEventStore::new(dir.path().join("data.json")));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.append(&sample_event(i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let events = store.load().await;
        assert_eq!(events.len(), 20);
        for i in 0..20 {
            let message = format!("message {}", i);
            assert!(events.iter().any(|e| e.message == message));
        }
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryEventStore::new();
        assert!(store.is_empty());

        store.append(&sample_event(1)).await.unwrap();
        store.append(&sample_event(2)).await.unwrap();

        let events = store.load().await;
        assert_eq!(store.len(), 2);
        assert_eq!(events[0].message, "message 1");
        assert_eq!(events[1].message, "message 2");
    }
}
