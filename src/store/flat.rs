use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::{now_timestamp, TaskStore};
use crate::error::StoreError;
use crate::kv::KeyValue;
use crate::models::{Task, TaskInput, TaskPatch, TaskStats};

pub const TASKS_KEY: &str = "productivity_tasks";

/// The single blob entry: the whole collection plus the next id to assign.
/// Serialized as `{ "tasks": [...], "idCounter": n }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatData {
    tasks: Vec<Task>,
    id_counter: i64,
}

impl Default for FlatData {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            id_counter: 1,
        }
    }
}

/// Flat engine: the collection lives in memory and is mirrored to one
/// key-value blob on every successful mutation. Mutations stage a copy,
/// persist it, and only then commit, so memory and blob never diverge.
pub struct FlatTaskStore {
    kv: Box<dyn KeyValue>,
    inner: Mutex<FlatData>,
}

impl FlatTaskStore {
    pub fn open(kv: Box<dyn KeyValue>) -> Result<Self, StoreError> {
        let data = match kv.get(TASKS_KEY).map_err(StoreError::init)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(err) => {
                    // A blob we cannot parse must not block the app.
                    log::warn!("discarding unparseable task blob: {err}");
                    FlatData::default()
                }
            },
            None => FlatData::default(),
        };
        Ok(Self {
            kv,
            inner: Mutex::new(data),
        })
    }

    fn persist(&self, data: &FlatData) -> Result<(), StoreError> {
        let raw = serde_json::to_string(data).map_err(StoreError::write)?;
        self.kv.set(TASKS_KEY, &raw)
    }
}

impl TaskStore for FlatTaskStore {
    fn create(&self, input: TaskInput) -> Result<Task, StoreError> {
        let mut guard = self.inner.lock().expect("state poisoned");
        let task = Task {
            id: guard.id_counter,
            title: input.title,
            description: input.description,
            priority: input.priority,
            completed: false,
            created_at: now_timestamp(),
        };
        let mut next = guard.clone();
        next.tasks.insert(0, task.clone());
        next.id_counter += 1;
        self.persist(&next)?;
        *guard = next;
        Ok(task)
    }

    fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let guard = self.inner.lock().expect("state poisoned");
        let mut tasks = guard.tasks.clone();
        // Newest first; ties broken by id so both engines order identically.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let guard = self.inner.lock().expect("state poisoned");
        Ok(guard.tasks.iter().find(|task| task.id == id).cloned())
    }

    fn toggle_completion(&self, id: i64) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("state poisoned");
        let index = match guard.tasks.iter().position(|task| task.id == id) {
            Some(index) => index,
            None => return Ok(()),
        };
        let mut next = guard.clone();
        next.tasks[index].completed = !next.tasks[index].completed;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn update(&self, id: i64, patch: TaskPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut guard = self.inner.lock().expect("state poisoned");
        let index = match guard.tasks.iter().position(|task| task.id == id) {
            Some(index) => index,
            None => return Ok(()),
        };
        let mut next = guard.clone();
        let task = &mut next.tasks[index];
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("state poisoned");
        let index = match guard.tasks.iter().position(|task| task.id == id) {
            Some(index) => index,
            None => return Ok(()),
        };
        let mut next = guard.clone();
        next.tasks.remove(index);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn stats(&self) -> Result<TaskStats, StoreError> {
        let guard = self.inner.lock().expect("state poisoned");
        let total = guard.tasks.len() as u32;
        let completed = guard.tasks.iter().filter(|task| task.completed).count() as u32;
        Ok(TaskStats {
            total,
            completed,
            active: total - completed,
        })
    }
}
