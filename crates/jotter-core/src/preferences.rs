//! Persistent key/value preferences.
//!
//! Values are stored as plain text, e.g. the dark-mode flag is `"true"` or
//! `"false"`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Error, Result};

const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Trait for preference storage operations
pub trait PreferenceRepository: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Default location of the preferences file.
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jotter").join(PREFERENCES_FILE_NAME))
}

/// JSON-file implementation of `PreferenceRepository`
#[derive(Debug)]
pub struct FilePreferenceRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceRepository {
    /// Create a repository backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            Error::Preferences(format!(
                "Failed to parse preferences at {}: {error}",
                self.path.display()
            ))
        })
    }
}

impl PreferenceRepository for FilePreferenceRepository {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Preferences("preference lock poisoned".to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Preferences("preference lock poisoned".to_string()))?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        tracing::debug!(key, path = %self.path.display(), "Preference saved");
        Ok(())
    }
}

/// In-memory `PreferenceRepository`, primarily for tests.
///
/// Can be switched into a failing mode to simulate unavailable storage.
#[derive(Debug, Default)]
pub struct MemoryPreferenceRepository {
    values: Mutex<BTreeMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `values`.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let repo = Self::new();
        if let Ok(mut map) = repo.values.lock() {
            map.extend(values.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        }
        repo
    }

    /// Make every subsequent read and write fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::Preferences("storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PreferenceRepository for MemoryPreferenceRepository {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let values = self
            .values
            .lock()
            .map_err(|_| Error::Preferences("preference lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::Preferences("preference lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
