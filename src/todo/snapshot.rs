use super::models::AppState;
use super::store::TodoStore;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("snapshot is not valid state JSON: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("could not find a data directory for the snapshot")]
    NoDataDir,
}

/// A single durable slot holding the serialized `AppState`.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<AppState>, SnapshotError>;
    fn save(&self, state: &AppState) -> Result<(), SnapshotError>;
}

#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, SnapshotError> {
        let data_dir = dirs::data_dir().ok_or(SnapshotError::NoDataDir)?;
        Ok(Self::new(data_dir.join("todo").join("state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileSnapshot {
    fn load(&self) -> Result<Option<AppState>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let state = serde_json::from_str(&content).map_err(SnapshotError::Deserialize)?;
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(state).map_err(SnapshotError::Serialize)?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

/// Keeps the slot in memory; used for `--ephemeral` runs and tests.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    slot: RefCell<Option<String>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
        }
    }

    #[cfg(test)]
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemorySnapshot {
    fn load(&self) -> Result<Option<AppState>, SnapshotError> {
        match self.slot.borrow().as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(SnapshotError::Deserialize),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AppState) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(state).map_err(SnapshotError::Serialize)?;
        *self.slot.borrow_mut() = Some(raw);
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<Option<AppState>, SnapshotError> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> Result<(), SnapshotError> {
        (**self).save(state)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::rc::Rc<S> {
    fn load(&self) -> Result<Option<AppState>, SnapshotError> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> Result<(), SnapshotError> {
        (**self).save(state)
    }
}

/// Reads the prior session's state. Missing or unreadable snapshots fall back
/// to the default state.
pub fn load_or_default(snapshot: &dyn SnapshotStore) -> AppState {
    match snapshot.load() {
        Ok(Some(state)) => {
            debug!(todos = state.todos.len(), "restored snapshot");
            state
        }
        Ok(None) => {
            debug!("no snapshot found, starting empty");
            AppState::default()
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable snapshot");
            AppState::default()
        }
    }
}

/// Saves the state after every transition. Write failures are logged and
/// dropped; the in-memory state stays authoritative.
pub fn persist_on_change<S>(store: &mut TodoStore, snapshot: S)
where
    S: SnapshotStore + 'static,
{
    store.subscribe(move |state| {
        if let Err(e) = snapshot.save(state) {
            warn!(error = %e, "failed to write snapshot");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::models::{FilterState, TodoItem};
    use crate::todo::store::Action;
    use chrono::{TimeZone, Utc};
    use std::rc::Rc;
    use tempfile::TempDir;

    fn sample_state() -> AppState {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let done = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let mut state = AppState::with_todos(vec![
            TodoItem::new("1", "item1").created_at(created),
            TodoItem::new("2", "item2")
                .completed(true)
                .created_at(created)
                .completed_at(done),
        ]);
        state.ui.filter_state = FilterState::Active;
        state.ui.text_input = "half typed".to_string();
        state
    }

    #[test]
    fn test_file_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let snapshot = FileSnapshot::new(dir.path().join("nested").join("state.json"));

        snapshot.save(&sample_state()).unwrap();
        assert_eq!(snapshot.load().unwrap(), Some(sample_state()));

        let raw = fs::read_to_string(snapshot.path()).unwrap();
        assert!(raw.contains("\"completedAt\": \"2024-05-01T09:30:00Z\""));
    }

    #[test]
    fn test_file_snapshot_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let snapshot = FileSnapshot::new(dir.path().join("state.json"));
        assert_eq!(snapshot.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let snapshot = FileSnapshot::new(&path);
        assert!(matches!(snapshot.load(), Err(SnapshotError::Deserialize(_))));
        assert_eq!(load_or_default(&snapshot), AppState::default());
    }

    #[test]
    fn test_load_or_default_restores_state() {
        let snapshot = MemorySnapshot::new();
        snapshot.save(&sample_state()).unwrap();
        assert_eq!(load_or_default(&snapshot), sample_state());
    }

    #[test]
    fn test_load_accepts_partial_snapshot() {
        let snapshot = MemorySnapshot::with_raw(r#"{"todos":[{"id":"1","title":"item1"}]}"#);
        let state = load_or_default(&snapshot);
        assert_eq!(state.ui.filter_state, FilterState::All);
        assert_eq!(state.todos, vec![TodoItem::new("1", "item1")]);
    }

    #[test]
    fn test_persist_on_change_writes_after_every_dispatch() {
        let snapshot = Rc::new(MemorySnapshot::new());
        let mut store = TodoStore::default();
        persist_on_change(&mut store, Rc::clone(&snapshot));

        assert_eq!(snapshot.raw(), None);

        store.dispatch(Action::SetTextInput("milk".to_string()));
        store.dispatch(Action::AddTodo);

        assert_eq!(snapshot.load().unwrap().as_ref(), Some(store.state()));
    }

    #[test]
    fn test_persist_on_change_swallows_write_failures() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("state.json");
        fs::create_dir(&path).unwrap();

        let mut store = TodoStore::default();
        persist_on_change(&mut store, FileSnapshot::new(&path));
        store.dispatch(Action::SetTextInput("still works".to_string()));

        assert_eq!(store.state().ui.text_input, "still works");
    }
}
