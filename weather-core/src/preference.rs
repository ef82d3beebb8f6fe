//! Persistence of the selected city.
//!
//! A single string under [`SELECTED_CITY_KEY`]. Storage failures never reach
//! the caller: they are logged here and the caller keeps its in-memory city.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::error::WeatherError;

pub const SELECTED_CITY_KEY: &str = "selectedCity";

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, WeatherError>;
    fn set(&self, key: &str, value: &str) -> Result<(), WeatherError>;
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, WeatherError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            WeatherError::storage(format!("failed to read {}", self.path.display()), e)
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            WeatherError::storage(format!("failed to parse {}", self.path.display()), e)
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, WeatherError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WeatherError> {
        // An unreadable file is replaced rather than blocking every later save.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::storage(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| WeatherError::storage("failed to serialize preferences", e))?;

        fs::write(&self.path, json).map_err(|e| {
            WeatherError::storage(format!("failed to write {}", self.path.display()), e)
        })
    }
}

/// Process-local store, used in tests and when no data dir is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WeatherError> {
        let values = self.values.lock().map_err(|_| WeatherError::Storage {
            message: "memory store lock poisoned".into(),
            source: None,
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WeatherError> {
        let mut values = self.values.lock().map_err(|_| WeatherError::Storage {
            message: "memory store lock poisoned".into(),
            source: None,
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct CityPreferenceStore {
    store: Box<dyn KeyValueStore>,
}

impl CityPreferenceStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Last saved city, or `None` if never saved or unreadable.
    pub fn load(&self) -> Option<String> {
        match self.store.get(SELECTED_CITY_KEY) {
            Ok(city) => {
                debug!(?city, "loaded city preference");
                city
            }
            Err(err) => {
                warn!(error = %err, "failed to load city preference");
                None
            }
        }
    }

    pub fn save(&self, city: &str) {
        if let Err(err) = self.store.set(SELECTED_CITY_KEY, city) {
            warn!(error = %err, city, "failed to save city preference");
        }
    }
}

impl std::fmt::Debug for CityPreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CityPreferenceStore").finish_non_exhaustive()
    }
}
