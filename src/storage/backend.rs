//! Preference store abstraction.
//!
//! The plugin persists a handful of string preferences (theme, scroll
//! position). [`PreferenceStore`] keeps the application layer independent of
//! where they live.

use crate::domain::error::Result;

/// String key/value store for user preferences.
///
/// # Implementations
///
/// - [`JsonPreferences`](crate::storage::JsonPreferences): JSON file with atomic writes
/// - [`MemoryPreferences`](crate::storage::MemoryPreferences): in-memory, for tests and
///   for running without a writable data directory
///
/// # Examples
///
/// ```
/// use votefeed::storage::{MemoryPreferences, PreferenceStore, PREFERRED_THEME};
///
/// let mut prefs = MemoryPreferences::default();
/// prefs.set(PREFERRED_THEME, "light")?;
/// assert_eq!(prefs.get(PREFERRED_THEME)?.as_deref(), Some("light"));
/// # Ok::<(), votefeed::FeedError>(())
/// ```
pub trait PreferenceStore: Send {
    /// Reads a value. Returns `Ok(None)` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}
