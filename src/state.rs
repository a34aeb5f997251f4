use std::path::Path;

use crate::error::StoreError;
use crate::kv::FileKvStore;
use crate::prefs::PreferenceStore;
use crate::store::{open_task_store, StorageKind, TaskStore};

/// The long-lived stores, built once during startup and handed to the command
/// layer. Construction is explicit so tests can bind fresh stores to isolated
/// directories.
pub struct AppStores {
    pub tasks: Box<dyn TaskStore>,
    pub prefs: PreferenceStore,
}

impl AppStores {
    pub fn open(kind: StorageKind, data_dir: &Path) -> Result<Self, StoreError> {
        let tasks = open_task_store(kind, data_dir)?;
        let prefs = PreferenceStore::new(Box::new(FileKvStore::new(data_dir.to_path_buf())));
        Ok(Self { tasks, prefs })
    }
}
