//! Activity-store persistence.
//!
//! One JSON document holds the full store. Writes go through a temp file
//! and a rename so a crash mid-write never leaves a truncated document for
//! the next load to trip over.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::ActivityStore;
use crate::error::StoreError;

/// Persistence port for the activity store.
///
/// Injected into the tracker so tests can swap the file-backed
/// implementation for an in-memory one.
pub trait StorePersistence {
    /// Read the persisted store. Missing or structurally invalid state is
    /// first-run territory, not an error: implementations return an empty
    /// store instead of propagating.
    fn load(&self) -> ActivityStore;

    /// Serialize the full store to persistent state.
    fn save(&self, store: &ActivityStore) -> Result<(), StoreError>;
}

/// File-backed JSON persistence.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorePersistence for JsonStore {
    fn load(&self) -> ActivityStore {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return ActivityStore::new(),
        };

        match serde_json::from_str(&content) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt activity store, starting empty");
                ActivityStore::new()
            }
        }
    }

    fn save(&self, store: &ActivityStore) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(store)?;
        let tmp = self.path.with_extension("tmp");

        std::fs::write(&tmp, content).map_err(|source| StoreError::WriteFailed {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::ReplaceFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// In-memory persistence for tests: remembers the last saved snapshot.
#[cfg(test)]
pub(crate) mod memory {
    use std::cell::RefCell;

    use super::{ActivityStore, StoreError, StorePersistence};

    #[derive(Default)]
    pub struct MemoryStore {
        pub saved: RefCell<Option<ActivityStore>>,
        pub save_count: RefCell<usize>,
    }

    impl StorePersistence for MemoryStore {
        fn load(&self) -> ActivityStore {
            self.saved.borrow().clone().unwrap_or_default()
        }

        fn save(&self, store: &ActivityStore) -> Result<(), StoreError> {
            *self.saved.borrow_mut() = Some(store.clone());
            *self.save_count.borrow_mut() += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ActivityRecord;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_store() -> ActivityStore {
        let mut store = ActivityStore::new();
        let rec = store.get_or_create("111");
        *rec = ActivityRecord {
            problems_solved: 7,
            last_active: Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()),
            activity: [(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 2)]
                .into_iter()
                .collect(),
            goal: 10,
        };
        store.get_or_create("222");
        store
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonStore::new(dir.path().join("data.json"));

        let store = sample_store();
        persist.save(&store).unwrap();
        let loaded = persist.load();

        assert_eq!(loaded, store);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persist = JsonStore::new(dir.path().join("nope.json"));
        assert!(persist.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();

        let persist = JsonStore::new(path);
        assert!(persist.load().is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let persist = JsonStore::new(path.clone());

        persist.save(&sample_store()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
