use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{CurrentWeather, ForecastEntry, SavedCity, Units};

/// Version tag written into the persisted blob. Bump when the persisted
/// shape changes and add a migration arm in `load_persisted`.
const STATE_VERSION: u32 = 1;

/// Fixed storage identifier for the persisted snapshot.
const STATE_FILE_NAME: &str = "state.json";

/// Shared application state. Owned by the application root and passed by
/// reference to whoever needs it; there is no ambient singleton.
///
/// Only `saved_cities` and `units` survive a restart. Query results and
/// status flags always start from their initial values.
#[derive(Debug, Default)]
pub struct AppStore {
    pub current_weather: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
    pub loading: bool,
    pub error: Option<String>,
    pub saved_cities: Vec<SavedCity>,
    pub units: Units,
}

/// The subset of [`AppStore`] written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    saved_cities: Vec<SavedCity>,
    units: Units,
}

impl AppStore {
    pub fn set_current_weather(&mut self, weather: CurrentWeather) {
        self.current_weather = Some(weather);
    }

    pub fn set_forecast(&mut self, forecast: Vec<ForecastEntry>) {
        self.forecast = forecast;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Errors stay visible until explicitly dismissed.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Append a bookmark. Adding a name that is already present is a no-op:
    /// the first-added entry's values win. Names are compared exactly,
    /// case-sensitively.
    pub fn add_saved_city(&mut self, entry: SavedCity) {
        if self.saved_cities.iter().any(|city| city.name == entry.name) {
            tracing::debug!(name = %entry.name, "city already saved, ignoring");
            return;
        }
        self.saved_cities.push(entry);
    }

    /// Remove every bookmark with an exact name match. Removing a name that
    /// was never saved is a no-op.
    pub fn remove_saved_city(&mut self, name: &str) {
        self.saved_cities.retain(|city| city.name != name);
    }

    /// Overwrite the unit preference. Already-displayed data is not
    /// converted; it reflects the units it was fetched with.
    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    /// Load a fresh store, restoring `saved_cities` and `units` from the
    /// default state file if one exists.
    pub fn load() -> Result<Self> {
        let path = Self::state_file_path()?;
        Ok(Self::load_from(&path))
    }

    /// Load from an explicit path. A missing, unreadable, or incompatible
    /// blob yields a default store rather than an error: persisted
    /// preferences are never worth refusing to start over.
    pub fn load_from(path: &PathBuf) -> Self {
        let mut store = Self::default();

        let Some(persisted) = Self::load_persisted(path) else {
            return store;
        };

        store.saved_cities = persisted.saved_cities;
        store.units = persisted.units;
        store
    }

    fn load_persisted(path: &PathBuf) -> Option<PersistedState> {
        if !path.exists() {
            return None;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read state file, starting fresh");
                return None;
            }
        };

        let persisted: PersistedState = match serde_json::from_str(&contents) {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to parse state file, starting fresh");
                return None;
            }
        };

        if persisted.version != STATE_VERSION {
            tracing::warn!(
                found = persisted.version,
                expected = STATE_VERSION,
                "state file version mismatch, starting fresh"
            );
            return None;
        }

        Some(persisted)
    }

    /// Persist `saved_cities` and `units` to the default state file.
    pub fn save(&self) -> Result<()> {
        let path = Self::state_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let persisted = PersistedState {
            version: STATE_VERSION,
            saved_cities: self.saved_cities.clone(),
            units: self.units,
        };

        let json = serde_json::to_string_pretty(&persisted)
            .context("Failed to serialize application state")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the persisted state file.
    pub fn state_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join(STATE_FILE_NAME))
    }
}
