use crate::error::StoreError;
use crate::kv::KeyValue;
use crate::models::{Theme, UserSettings};

pub const USERNAME_KEY: &str = "user_username";
pub const THEME_KEY: &str = "user_theme";

/// User preferences behind the per-key store, one fixed key per value.
///
/// Reads degrade to defaults instead of failing: a missing or corrupt
/// preference must never block task management. Writes surface their errors.
pub struct PreferenceStore {
    kv: Box<dyn KeyValue>,
}

impl PreferenceStore {
    pub fn new(kv: Box<dyn KeyValue>) -> Self {
        Self { kv }
    }

    pub fn username(&self) -> String {
        match self.kv.get(USERNAME_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => String::new(),
            Err(err) => {
                log::warn!("username read failed, using default: {err}");
                String::new()
            }
        }
    }

    pub fn save_username(&self, value: &str) -> Result<(), StoreError> {
        self.kv.set(USERNAME_KEY, value)
    }

    /// Anything but the two known theme names counts as unset.
    pub fn theme(&self) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                log::warn!("theme read failed, using default: {err}");
                Theme::default()
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.kv.set(THEME_KEY, theme.as_str())
    }

    pub fn settings(&self) -> UserSettings {
        UserSettings {
            username: self.username(),
            theme: self.theme(),
        }
    }

    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.kv.remove(USERNAME_KEY)?;
        self.kv.remove(THEME_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::FileKvStore;

    struct FailingKv;

    impl KeyValue for FailingKv {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::read("injected read failure"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::write("injected write failure"))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::write("injected write failure"))
        }
    }

    fn store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceStore::new(Box::new(FileKvStore::new(dir.path().to_path_buf())));
        (dir, prefs)
    }

    #[test]
    fn never_written_store_yields_defaults() {
        let (_dir, prefs) = store();
        assert_eq!(prefs.username(), "");
        assert_eq!(prefs.theme(), Theme::Light);
    }

    #[test]
    fn username_and_theme_round_trip() {
        let (_dir, prefs) = store();
        prefs.save_username("Alex").unwrap();
        prefs.save_theme(Theme::Dark).unwrap();
        assert_eq!(prefs.username(), "Alex");
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn unknown_theme_value_falls_back_to_light() {
        let (dir, prefs) = store();
        let kv = FileKvStore::new(dir.path().to_path_buf());
        kv.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(prefs.theme(), Theme::Light);
    }

    #[test]
    fn read_failures_degrade_to_defaults() {
        let prefs = PreferenceStore::new(Box::new(FailingKv));
        assert_eq!(prefs.username(), "");
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(
            prefs.settings(),
            UserSettings {
                username: String::new(),
                theme: Theme::Light,
            }
        );
    }

    #[test]
    fn write_failures_are_surfaced() {
        let prefs = PreferenceStore::new(Box::new(FailingKv));
        assert!(matches!(
            prefs.save_username("x"),
            Err(StoreError::Write(_))
        ));
        assert!(matches!(
            prefs.save_theme(Theme::Dark),
            Err(StoreError::Write(_))
        ));
        assert!(matches!(prefs.clear_all(), Err(StoreError::Write(_))));
    }

    #[test]
    fn settings_combines_both_values() {
        let (_dir, prefs) = store();
        prefs.save_username("Sam").unwrap();
        prefs.save_theme(Theme::Dark).unwrap();
        assert_eq!(
            prefs.settings(),
            UserSettings {
                username: "Sam".to_string(),
                theme: Theme::Dark,
            }
        );
    }

    #[test]
    fn clear_all_removes_both_keys() {
        let (_dir, prefs) = store();
        prefs.save_username("Sam").unwrap();
        prefs.save_theme(Theme::Dark).unwrap();

        prefs.clear_all().unwrap();
        assert_eq!(prefs.username(), "");
        assert_eq!(prefs.theme(), Theme::Light);

        // Clearing an already-empty store is fine.
        prefs.clear_all().unwrap();
    }
}
