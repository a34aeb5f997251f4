pub mod flat;
pub mod sqlite;

use std::path::Path;

use chrono::{SecondsFormat, Utc};

use crate::error::StoreError;
use crate::kv::FileKvStore;
use crate::models::{Task, TaskInput, TaskPatch, TaskStats};

pub const DATABASE_FILE: &str = "productivity.db";

/// Query and mutation surface shared by both storage engines.
///
/// The engines are interchangeable: same id assignment (starting at 1,
/// strictly increasing, never reused), same list ordering (`created_at`
/// descending, id descending on ties), same aggregate semantics. Mutations on
/// a missing id are silent no-ops.
pub trait TaskStore: Send + Sync {
    fn create(&self, input: TaskInput) -> Result<Task, StoreError>;
    fn list_all(&self) -> Result<Vec<Task>, StoreError>;
    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError>;
    fn toggle_completion(&self, id: i64) -> Result<(), StoreError>;
    fn update(&self, id: i64, patch: TaskPatch) -> Result<(), StoreError>;
    fn delete(&self, id: i64) -> Result<(), StoreError>;
    fn stats(&self) -> Result<TaskStats, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Flat,
}

impl StorageKind {
    /// Engine selection happens once at startup. The structured engine is the
    /// default wherever the bundled SQLite runtime is available;
    /// `PRODUCTIVITY_STORAGE=flat|sqlite` overrides for portable installs.
    pub fn detect() -> Self {
        Self::from_env_value(std::env::var("PRODUCTIVITY_STORAGE").ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("flat") => StorageKind::Flat,
            _ => StorageKind::Sqlite,
        }
    }
}

/// Builds the selected engine under `data_dir`, creating the directory first.
/// Any failure here is fatal to the application.
pub fn open_task_store(
    kind: StorageKind,
    data_dir: &Path,
) -> Result<Box<dyn TaskStore>, StoreError> {
    std::fs::create_dir_all(data_dir).map_err(StoreError::init)?;
    let store: Box<dyn TaskStore> = match kind {
        StorageKind::Sqlite => Box::new(sqlite::SqliteTaskStore::open(
            &data_dir.join(DATABASE_FILE),
        )?),
        StorageKind::Flat => Box::new(flat::FlatTaskStore::open(Box::new(FileKvStore::new(
            data_dir.to_path_buf(),
        )))?),
    };
    log::info!("task store ready kind={kind:?} dir={}", data_dir.display());
    Ok(store)
}

/// Millisecond UTC, e.g. `2026-08-23T12:34:56.789Z`; sorts lexicographically.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
