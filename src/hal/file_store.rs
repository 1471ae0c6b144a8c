//! JSON file backed settings store for the desktop simulator.
//!
//! The file holds one object keyed by the wire ids of the settings, e.g.
//! `{"0": true, "1": false}`. It is rewritten on every write, so the
//! preferences survive a restart of the simulator.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;

use crate::messages::SettingKey;
use crate::traits::SettingsStore;

/// Settings persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<u32, bool>,
}

impl FileStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let bytes = fs::read(&path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing settings in {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!("opened settings store {} ({} records)", path.display(), values.len());
        Ok(Self { path, values })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing settings to {}", self.path.display()))
    }
}

impl SettingsStore for FileStore {
    type Error = anyhow::Error;

    fn read_bool(&self, key: SettingKey) -> anyhow::Result<Option<bool>> {
        Ok(self.values.get(&key.id()).copied())
    }

    fn write_bool(&mut self, key: SettingKey, value: bool) -> anyhow::Result<()> {
        let previous = self.values.insert(key.id(), value);
        if let Err(e) = self.flush() {
            // keep memory and disk in agreement so the retry rewrites it
            match previous {
                Some(v) => self.values.insert(key.id(), v),
                None => self.values.remove(&key.id()),
            };
            return Err(e);
        }
        Ok(())
    }
}
