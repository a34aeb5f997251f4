use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{now_timestamp, TaskStore};
use crate::error::StoreError;
use crate::models::{Priority, Task, TaskInput, TaskPatch, TaskStats};

// `createdAt` keeps the camelCase spelling so the column name matches the
// serialized field name the rest of the app sees.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    priority TEXT NOT NULL CHECK (priority IN ('high', 'medium', 'low')),
    completed INTEGER NOT NULL DEFAULT 0,
    createdAt TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(createdAt DESC);
";

const SELECT_COLUMNS: &str = "SELECT id, title, description, priority, completed, createdAt FROM tasks";

/// Structured engine: one schema-constrained table behind a shared connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::init)?;
        conn.execute_batch(SCHEMA).map_err(StoreError::init)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::init)?;
        conn.execute_batch(SCHEMA).map_err(StoreError::init)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(3)?;
    let priority = Priority::parse(&priority).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid priority: {priority}").into(),
        )
    })?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority,
        completed: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl TaskStore for SqliteTaskStore {
    fn create(&self, input: TaskInput) -> Result<Task, StoreError> {
        let created_at = now_timestamp();
        let conn = self.conn.lock().expect("connection poisoned");
        conn.execute(
            "INSERT INTO tasks (title, description, priority, completed, createdAt) \
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![input.title, input.description, input.priority.as_str(), created_at],
        )
        .map_err(StoreError::write)?;
        let id = conn.last_insert_rowid();
        Ok(Task {
            id,
            title: input.title,
            description: input.description,
            priority: input.priority,
            completed: false,
            created_at,
        })
    }

    fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY createdAt DESC, id DESC"
            ))
            .map_err(StoreError::read)?;
        let rows = stmt.query_map([], task_from_row).map_err(StoreError::read)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(StoreError::read)?);
        }
        Ok(tasks)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id],
            task_from_row,
        )
        .optional()
        .map_err(StoreError::read)
    }

    fn toggle_completion(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        // Zero affected rows means the id does not exist; not an error.
        conn.execute(
            "UPDATE tasks SET completed = NOT completed WHERE id = ?1",
            params![id],
        )
        .map_err(StoreError::write)?;
        Ok(())
    }

    fn update(&self, id: i64, patch: TaskPatch) -> Result<(), StoreError> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(title) = patch.title {
            sets.push("title = ?".to_string());
            values.push(Box::new(title));
        }
        if let Some(description) = patch.description {
            sets.push("description = ?".to_string());
            values.push(Box::new(description));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?".to_string());
            values.push(Box::new(priority.as_str().to_string()));
        }
        if sets.is_empty() {
            return Ok(());
        }
        values.push(Box::new(id));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
        let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(AsRef::as_ref).collect();
        let conn = self.conn.lock().expect("connection poisoned");
        conn.execute(&sql, params.as_slice())
            .map_err(StoreError::write)?;
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(StoreError::write)?;
        Ok(())
    }

    fn stats(&self) -> Result<TaskStats, StoreError> {
        let conn = self.conn.lock().expect("connection poisoned");
        let total: u32 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .map_err(StoreError::read)?;
        let completed: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM tasks WHERE completed = 1",
                [],
                |row| row.get(0),
            )
            .map_err(StoreError::read)?;
        Ok(TaskStats {
            total,
            completed,
            active: total - completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteTaskStore {
        SqliteTaskStore::open_in_memory().unwrap()
    }

    fn input(title: &str, priority: Priority) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: String::new(),
            priority,
        }
    }

    #[test]
    fn create_assigns_sequential_ids_starting_at_one() {
        let store = store();
        let first = store.create(input("first", Priority::Medium)).unwrap();
        let second = store.create(input("second", Priority::High)).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.completed);
        assert!(!first.created_at.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        store.create(input("a", Priority::Medium)).unwrap();
        let b = store.create(input("b", Priority::Medium)).unwrap();
        store.delete(b.id).unwrap();
        let c = store.create(input("c", Priority::Medium)).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn get_by_id_returns_none_for_missing_row() {
        let store = store();
        assert_eq!(store.get_by_id(42).unwrap(), None);
    }

    #[test]
    fn toggle_flips_in_place_and_missing_id_is_a_no_op() {
        let store = store();
        let t = store.create(input("t", Priority::Low)).unwrap();

        store.toggle_completion(t.id).unwrap();
        assert!(store.get_by_id(t.id).unwrap().unwrap().completed);
        store.toggle_completion(t.id).unwrap();
        assert!(!store.get_by_id(t.id).unwrap().unwrap().completed);

        store.toggle_completion(12345).unwrap();
        assert_eq!(store.stats().unwrap().completed, 0);
    }

    #[test]
    fn update_changes_only_provided_fields() {
        let store = store();
        let t = store
            .create(TaskInput {
                title: "orig".to_string(),
                description: "keep me".to_string(),
                priority: Priority::Low,
            })
            .unwrap();

        store
            .update(
                t.id,
                TaskPatch {
                    title: Some("renamed".to_string()),
                    priority: Some(Priority::High),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        let back = store.get_by_id(t.id).unwrap().unwrap();
        assert_eq!(back.title, "renamed");
        assert_eq!(back.description, "keep me");
        assert_eq!(back.priority, Priority::High);
        assert_eq!(back.created_at, t.created_at);
    }

    #[test]
    fn update_with_empty_patch_is_a_no_op() {
        let store = store();
        let t = store.create(input("t", Priority::Medium)).unwrap();
        store.update(t.id, TaskPatch::default()).unwrap();
        assert_eq!(store.get_by_id(t.id).unwrap().unwrap(), t);
    }

    #[test]
    fn delete_then_get_returns_none_and_missing_delete_is_silent() {
        let store = store();
        let t = store.create(input("t", Priority::Medium)).unwrap();
        store.delete(t.id).unwrap();
        assert_eq!(store.get_by_id(t.id).unwrap(), None);
        store.delete(t.id).unwrap();
    }

    #[test]
    fn stats_counts_add_up() {
        let store = store();
        for i in 0..4 {
            let t = store.create(input(&format!("t{i}"), Priority::Medium)).unwrap();
            if i % 2 == 0 {
                store.toggle_completion(t.id).unwrap();
            }
        }
        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.total as usize, store.list_all().unwrap().len());
    }

    #[test]
    fn schema_rejects_priority_outside_the_enumeration() {
        let store = store();
        let conn = store.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO tasks (title, description, priority, completed, createdAt) \
             VALUES ('x', '', 'urgent', 0, '2026-08-23T10:00:00.000Z')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn reopen_preserves_rows_and_id_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        {
            let store = SqliteTaskStore::open(&path).unwrap();
            store.create(input("persisted", Priority::High)).unwrap();
            let doomed = store.create(input("doomed", Priority::Low)).unwrap();
            store.delete(doomed.id).unwrap();
        }

        let store = SqliteTaskStore::open(&path).unwrap();
        let tasks = store.list_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "persisted");

        // AUTOINCREMENT keeps counting across restarts.
        let next = store.create(input("next", Priority::Medium)).unwrap();
        assert_eq!(next.id, 3);
    }
}
