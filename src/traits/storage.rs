//! Persistent key-value store for display preferences.

use crate::messages::SettingKey;

/// Persistent storage of the boolean display preferences.
///
/// Records are keyed by the same integer ids the companion uses on the wire
/// (see [`SettingKey::id`]). Values must survive a restart.
///
/// # Implementation Notes
///
/// - `read_bool` returns `Ok(None)` for a key that was never written
/// - Writes are synchronous; the caller logs failures and retries later
pub trait SettingsStore {
    /// Error type for storage operations.
    type Error: core::fmt::Debug;

    /// Reads a stored flag, `None` if absent.
    fn read_bool(&self, key: SettingKey) -> Result<Option<bool>, Self::Error>;

    /// Writes a flag.
    fn write_bool(&mut self, key: SettingKey, value: bool) -> Result<(), Self::Error>;

    /// Returns true if a value has been stored for `key`.
    fn contains(&self, key: SettingKey) -> bool {
        matches!(self.read_bool(key), Ok(Some(_)))
    }
}
