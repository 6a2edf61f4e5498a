use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

use crate::{
    StoreError, TemperatureUnit,
    persist::{read_optional, write_atomic},
};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    temperature_unit: TemperatureUnit,
}

/// Durable home of the user's unit preference.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    unit: watch::Sender<TemperatureUnit>,
}

impl SettingsStore {
    /// Open the settings file at `path`; a missing file means defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let file = match read_optional(&path)? {
            Some(contents) => {
                toml::from_str::<SettingsFile>(&contents).map_err(|e| StoreError::Deserialize {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            None => SettingsFile::default(),
        };

        let (unit, _) = watch::channel(file.temperature_unit);

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            unit,
        })
    }

    pub fn in_dir(dir: &Path) -> Result<Self, StoreError> {
        Self::open(dir.join(SETTINGS_FILE))
    }

    pub fn unit(&self) -> TemperatureUnit {
        *self.unit.borrow()
    }

    /// Persist `unit`. Fetches started afterwards use it; already running ones do not.
    pub fn set_unit(&self, unit: TemperatureUnit) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        let file = SettingsFile {
            temperature_unit: unit,
        };
        let contents =
            toml::to_string_pretty(&file).map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomic(&self.path, contents.as_bytes())?;

        let previous = self.unit.send_replace(unit);
        if previous != unit {
            info!(from = %previous, to = %unit, "temperature unit changed");
        }

        Ok(())
    }

    pub fn unit_display_label(&self) -> &'static str {
        self.unit().display_label()
    }

    /// Observe unit changes.
    pub fn subscribe(&self) -> watch::Receiver<TemperatureUnit> {
        self.unit.subscribe()
    }
}
