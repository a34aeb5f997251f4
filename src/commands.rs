use crate::models::{
    Filter, Task, TaskInput, TaskPatch, TaskStats, Theme, UserSettings, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS, USERNAME_MAX_CHARS,
};
use crate::state::AppStores;

#[cfg(all(feature = "app", not(test)))]
use tauri::State;

#[derive(Debug, serde::Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

pub fn load_tasks_impl(stores: &AppStores, filter: Option<Filter>) -> CommandResult<Vec<Task>> {
    let tasks = match stores.tasks.list_all() {
        Ok(tasks) => tasks,
        Err(error) => return err(&format!("store error: {error}")),
    };
    let filter = filter.unwrap_or_default();
    ok(tasks
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect())
}

pub fn create_task_impl(stores: &AppStores, input: TaskInput) -> CommandResult<Task> {
    // The form is the gatekeeper for text shape; the stores accept any text.
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return err("task title must not be empty");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return err("task title is too long");
    }
    let description = input.description.trim().to_string();
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return err("task description is too long");
    }

    let input = TaskInput {
        title,
        description,
        priority: input.priority,
    };
    match stores.tasks.create(input) {
        Ok(task) => ok(task),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn get_task_impl(stores: &AppStores, id: i64) -> CommandResult<Option<Task>> {
    match stores.tasks.get_by_id(id) {
        Ok(task) => ok(task),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn toggle_task_impl(stores: &AppStores, id: i64) -> CommandResult<bool> {
    match stores.tasks.toggle_completion(id) {
        Ok(()) => ok(true),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn update_task_impl(stores: &AppStores, id: i64, patch: TaskPatch) -> CommandResult<bool> {
    let mut patch = patch;
    if let Some(title) = patch.title.take() {
        let title = title.trim().to_string();
        if title.is_empty() {
            return err("task title must not be empty");
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return err("task title is too long");
        }
        patch.title = Some(title);
    }
    if let Some(description) = patch.description.take() {
        let description = description.trim().to_string();
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return err("task description is too long");
        }
        patch.description = Some(description);
    }

    match stores.tasks.update(id, patch) {
        Ok(()) => ok(true),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn delete_task_impl(stores: &AppStores, id: i64) -> CommandResult<bool> {
    match stores.tasks.delete(id) {
        Ok(()) => ok(true),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn task_stats_impl(stores: &AppStores) -> CommandResult<TaskStats> {
    match stores.tasks.stats() {
        Ok(stats) => ok(stats),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn load_settings_impl(stores: &AppStores) -> CommandResult<UserSettings> {
    // Preference reads degrade to defaults inside the store, so this cannot fail.
    ok(stores.prefs.settings())
}

pub fn save_username_impl(stores: &AppStores, username: String) -> CommandResult<String> {
    let username = username.trim().to_string();
    if username.chars().count() > USERNAME_MAX_CHARS {
        return err("username is too long");
    }
    match stores.prefs.save_username(&username) {
        Ok(()) => ok(username),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn save_theme_impl(stores: &AppStores, theme: Theme) -> CommandResult<Theme> {
    match stores.prefs.save_theme(theme) {
        Ok(()) => ok(theme),
        Err(error) => err(&format!("store error: {error}")),
    }
}

pub fn clear_settings_impl(stores: &AppStores) -> CommandResult<bool> {
    match stores.prefs.clear_all() {
        Ok(()) => ok(true),
        Err(error) => err(&format!("store error: {error}")),
    }
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn load_tasks(state: State<AppStores>, filter: Option<Filter>) -> CommandResult<Vec<Task>> {
    load_tasks_impl(state.inner(), filter)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn create_task(state: State<AppStores>, input: TaskInput) -> CommandResult<Task> {
    create_task_impl(state.inner(), input)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn get_task(state: State<AppStores>, id: i64) -> CommandResult<Option<Task>> {
    get_task_impl(state.inner(), id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn toggle_task(state: State<AppStores>, id: i64) -> CommandResult<bool> {
    toggle_task_impl(state.inner(), id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn update_task(state: State<AppStores>, id: i64, patch: TaskPatch) -> CommandResult<bool> {
    update_task_impl(state.inner(), id, patch)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn delete_task(state: State<AppStores>, id: i64) -> CommandResult<bool> {
    delete_task_impl(state.inner(), id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn task_stats(state: State<AppStores>) -> CommandResult<TaskStats> {
    task_stats_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn load_settings(state: State<AppStores>) -> CommandResult<UserSettings> {
    load_settings_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn save_username(state: State<AppStores>, username: String) -> CommandResult<String> {
    save_username_impl(state.inner(), username)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn save_theme(state: State<AppStores>, theme: Theme) -> CommandResult<Theme> {
    save_theme_impl(state.inner(), theme)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn clear_settings(state: State<AppStores>) -> CommandResult<bool> {
    clear_settings_impl(state.inner())
}
