//! JSON file preference store.
//!
//! The whole file is held in memory and rewritten on every change using a
//! temporary file and a rename, so a crash never leaves a truncated file.

use crate::domain::error::{FeedError, Result};
use crate::storage::backend::PreferenceStore;
use crate::storage::models::PreferenceFile;
use std::path::{Path, PathBuf};

/// Preferences persisted to a JSON file.
///
/// # Examples
///
/// ```no_run
/// use votefeed::storage::{JsonPreferences, PreferenceStore, PREFERRED_THEME};
///
/// let mut prefs = JsonPreferences::open("/data/preferences.json")?;
/// prefs.set(PREFERRED_THEME, "dark")?;
/// # Ok::<(), votefeed::FeedError>(())
/// ```
#[derive(Debug)]
pub struct JsonPreferences {
    file_path: PathBuf,
    data: PreferenceFile,
}

impl JsonPreferences {
    /// Opens the file at `path`, starting empty if it does not exist.
    ///
    /// Parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the file
    /// exists but cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        tracing::debug!(path = ?file_path, "opening preference file");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            PreferenceFile::default()
        };

        tracing::debug!(values = data.values.len(), "preferences loaded");
        Ok(Self { file_path, data })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<PreferenceFile> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| FeedError::Storage(format!("failed to parse {}: {e}", path.display())))
    }

    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| FeedError::Storage(format!("failed to serialize preferences: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!(path = ?self.file_path, "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("preference_set", key).entered();

        if self.data.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.data.values.insert(key.to_string(), value.to_string());
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.data.values.remove(key).is_some() {
            self.save_to_file()?;
        }
        Ok(())
    }
}
