//! Display preferences and their persistence.
//!
//! [`SettingsController`] owns the live [`DisplayConfig`] and the
//! [`SettingsStore`] behind it. Every mutation goes through
//! [`SettingsController::validate`] first and is written to the store before
//! it is applied in memory.
//!
//! # Example
//!
//! ```rust
//! use aviator_face::config::Capabilities;
//! use aviator_face::hal::MockStore;
//! use aviator_face::settings::{SettingEffect, SettingsController};
//!
//! let mut settings = SettingsController::load(MockStore::new(), Capabilities::ALL);
//! assert!(settings.config().seconds_visible);
//!
//! let cmd = settings.validate(0, "off").unwrap();
//! assert_eq!(settings.apply(cmd), SettingEffect::NextTick);
//! assert!(!settings.config().seconds_visible);
//! ```

use heapless::Vec;
use log::{info, warn};

use crate::config::Capabilities;
use crate::messages::{ConfigCommand, RejectReason, SettingKey, Toggle};
use crate::traits::SettingsStore;

/// Live display preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// The second hand is computed and drawn.
    pub seconds_visible: bool,
    /// Inverted background and hand colours.
    pub inverted: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            seconds_visible: SettingKey::SecondsVisible.default_value(),
            inverted: SettingKey::ColorInversion.default_value(),
        }
    }
}

impl DisplayConfig {
    /// Current value of `key`.
    pub const fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::SecondsVisible => self.seconds_visible,
            SettingKey::ColorInversion => self.inverted,
        }
    }

    fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::SecondsVisible => self.seconds_visible = value,
            SettingKey::ColorInversion => self.inverted = value,
        }
    }
}

/// What the rest of the face has to do after a setting was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SettingEffect {
    /// Nothing now; the next tick picks the change up.
    NextTick,
    /// Recompute every indicator immediately.
    RefreshAll,
    /// Tear down and rebuild every rendering resource.
    Rebuild,
}

/// Owner of the persisted display preferences.
pub struct SettingsController<S: SettingsStore> {
    store: S,
    config: DisplayConfig,
    capabilities: Capabilities,
    /// Keys whose last write failed and must be written again.
    unsaved: Vec<SettingKey, 2>,
}

impl<S: SettingsStore> SettingsController<S> {
    /// Loads preferences from `store`.
    ///
    /// Absent or unreadable records fall back to their defaults, as do
    /// preferences the variant does not let the user change.
    pub fn load(store: S, capabilities: Capabilities) -> Self {
        let mut config = DisplayConfig::default();
        for key in SettingKey::ALL {
            if !capabilities.supports(key) {
                continue;
            }
            match store.read_bool(key) {
                Ok(Some(value)) => config.set(key, value),
                Ok(None) => {}
                Err(e) => warn!("failed to read setting {:?}: {:?}", key, e),
            }
        }
        Self {
            store,
            config,
            capabilities,
            unsaved: Vec::new(),
        }
    }

    /// Current preferences.
    #[inline]
    pub fn config(&self) -> DisplayConfig {
        self.config
    }

    /// Preferences this controller accepts.
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The backing store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store.
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns true if some preference has not reached the store yet.
    pub fn has_unsaved(&self) -> bool {
        !self.unsaved.is_empty()
    }

    /// Validates one raw entry against the closed key set and this variant.
    pub fn validate(&self, key: u32, value: &str) -> Result<ConfigCommand, RejectReason> {
        let cmd = ConfigCommand::parse(key, value)?;
        if !self.capabilities.supports(cmd.key) {
            return Err(RejectReason::UnsupportedKey(cmd.key));
        }
        Ok(cmd)
    }

    /// Persists then applies a validated command.
    pub fn apply(&mut self, cmd: ConfigCommand) -> SettingEffect {
        let value = cmd.value.as_bool();
        self.persist(cmd.key, value);
        self.config.set(cmd.key, value);
        info!("{:?} set to {}", cmd.key, cmd.value.as_str());

        match (cmd.key, cmd.value) {
            (SettingKey::ColorInversion, _) => SettingEffect::Rebuild,
            (SettingKey::SecondsVisible, Toggle::On) => SettingEffect::RefreshAll,
            (SettingKey::SecondsVisible, Toggle::Off) => SettingEffect::NextTick,
        }
    }

    /// Puts back a previous configuration, in memory and in the store.
    pub fn restore(&mut self, previous: DisplayConfig) {
        for key in SettingKey::ALL {
            if self.config.get(key) != previous.get(key) {
                self.persist(key, previous.get(key));
            }
        }
        self.config = previous;
    }

    /// Consumes the controller, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Writes `key`, retrying earlier failed writes first.
    fn persist(&mut self, key: SettingKey, value: bool) {
        let pending = core::mem::take(&mut self.unsaved);
        for retry in pending.into_iter().filter(|k| *k != key) {
            let retry_value = self.config.get(retry);
            if let Err(e) = self.store.write_bool(retry, retry_value) {
                warn!("retry of {:?} failed: {:?}", retry, e);
                self.mark_unsaved(retry);
            }
        }

        if let Err(e) = self.store.write_bool(key, value) {
            warn!("failed to persist {:?}: {:?}", key, e);
            self.mark_unsaved(key);
        }
    }

    fn mark_unsaved(&mut self, key: SettingKey) {
        if !self.unsaved.contains(&key) {
            // capacity equals the number of keys
            let _ = self.unsaved.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockStore;

    fn controller() -> SettingsController<MockStore> {
        SettingsController::load(MockStore::new(), Capabilities::ALL)
    }

    #[test]
    fn load_defaults_when_store_empty() {
        let settings = controller();
        assert_eq!(settings.config(), DisplayConfig::default());
        assert!(settings.config().seconds_visible);
        assert!(!settings.config().inverted);
    }

    #[test]
    fn load_reads_stored_values() {
        let store = MockStore::new()
            .with_value(SettingKey::SecondsVisible, false)
            .with_value(SettingKey::ColorInversion, true);
        let settings = SettingsController::load(store, Capabilities::ALL);
        assert!(!settings.config().seconds_visible);
        assert!(settings.config().inverted);
    }

    #[test]
    fn load_ignores_unsupported_keys() {
        let store = MockStore::new().with_value(SettingKey::ColorInversion, true);
        let settings = SettingsController::load(store, Capabilities::NONE);
        assert!(!settings.config().inverted);
    }

    #[test]
    fn load_survives_read_failure() {
        let mut store = MockStore::new().with_value(SettingKey::SecondsVisible, false);
        store.fail_reads = true;
        let settings = SettingsController::load(store, Capabilities::ALL);
        assert_eq!(settings.config(), DisplayConfig::default());
    }

    #[test]
    fn apply_persists_before_applying() {
        let mut settings = controller();
        let cmd = settings.validate(1, "on").unwrap();
        assert_eq!(settings.apply(cmd), SettingEffect::Rebuild);
        assert!(settings.config().inverted);
        assert_eq!(settings.store().value(SettingKey::ColorInversion), Some(true));
        assert_eq!(settings.store().writes, 1);
    }

    #[test]
    fn seconds_effects() {
        let mut settings = controller();
        let off = settings.validate(0, "off").unwrap();
        assert_eq!(settings.apply(off), SettingEffect::NextTick);
        let on = settings.validate(0, "on").unwrap();
        assert_eq!(settings.apply(on), SettingEffect::RefreshAll);
    }

    #[test]
    fn validate_rejects_unsupported() {
        let settings = SettingsController::load(MockStore::new(), Capabilities::NONE);
        assert_eq!(
            settings.validate(1, "on"),
            Err(RejectReason::UnsupportedKey(SettingKey::ColorInversion))
        );
    }

    #[test]
    fn failed_write_still_applies_and_retries() {
        let mut settings = controller();
        settings.store_mut().fail_writes = true;

        let cmd = settings.validate(0, "off").unwrap();
        settings.apply(cmd);
        assert!(!settings.config().seconds_visible);
        assert!(settings.has_unsaved());
        assert_eq!(settings.store().value(SettingKey::SecondsVisible), None);

        // next write succeeds and flushes the earlier failure too
        settings.store_mut().fail_writes = false;
        let cmd = settings.validate(1, "on").unwrap();
        settings.apply(cmd);
        assert!(!settings.has_unsaved());
        assert_eq!(settings.store().value(SettingKey::SecondsVisible), Some(false));
        assert_eq!(settings.store().value(SettingKey::ColorInversion), Some(true));
    }

    #[test]
    fn restore_reverts_store_and_memory() {
        let mut settings = controller();
        let before = settings.config();
        let cmd = settings.validate(1, "on").unwrap();
        settings.apply(cmd);

        settings.restore(before);
        assert_eq!(settings.config(), before);
        assert_eq!(settings.store().value(SettingKey::ColorInversion), Some(false));
    }
}
