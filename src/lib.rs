pub mod commands;
pub mod error;
pub mod kv;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod state;
pub mod store;

#[cfg(all(feature = "app", not(test)))]
use tauri::Manager;

#[cfg(all(feature = "app", not(test)))]
use crate::commands::*;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
#[cfg(all(feature = "app", not(test)))]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;

            // Logging is best-effort; a read-only log directory must not stop startup.
            if let Err(err) = logging::init_logging(&data_dir) {
                eprintln!("logging unavailable: {err}");
            }

            // Store initialization failure aborts startup here; the frontend
            // shows its dedicated error screen when the backend never comes up.
            let stores = state::AppStores::open(store::StorageKind::detect(), &data_dir)?;
            app.manage(stores);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            load_tasks,
            create_task,
            get_task,
            toggle_task,
            update_task,
            delete_task,
            task_stats,
            load_settings,
            save_username,
            save_theme,
            clear_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
