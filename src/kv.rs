use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::error::StoreError;

/// Per-key text storage, the durable primitive under the preference store and
/// the flat task engine. `get` of a missing key is `Ok(None)`; `remove` of a
/// missing key is `Ok(())`.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One file per key under the app data directory. Keys are fixed program
/// constants, so they map to file names directly.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValue for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::read(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(StoreError::write)?;
        let path = self.key_path(key);
        // Write-then-rename so a crash mid-write never leaves a truncated value.
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path).map_err(StoreError::write)?;
            file.write_all(value.as_bytes()).map_err(StoreError::write)?;
            file.sync_all().map_err(StoreError::write)?;
        }
        fs::rename(temp_path, path).map_err(StoreError::write)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::write(err)),
        }
    }
}
