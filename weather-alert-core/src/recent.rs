//! Persistent, capped list of recently searched cities.

use anyhow::{Context, Result};
use std::{collections::HashMap, fmt::Debug, fs, io::ErrorKind, path::PathBuf};
use tracing::warn;

/// Storage key holding the JSON-encoded recent-city array.
pub const RECENT_CITIES_KEY: &str = "recent_cities";

/// Maximum number of cities kept in the list.
pub const MAX_RECENT_CITIES: usize = 5;

/// Minimal string key/value persistence.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps values in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read stored value: {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create data directory: {}", self.dir.display())
        })?;

        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write stored value: {}", path.display()))?;

        Ok(())
    }
}

/// Display form of the recent-searches row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentChips {
    /// Shown when nothing has been searched yet.
    Placeholder(&'static str),
    Cities(Vec<String>),
}

/// Ordered, case-insensitively de-duplicated list of recent cities,
/// most recent first.
#[derive(Debug)]
pub struct RecentCityStore {
    store: Box<dyn KeyValueStore>,
}

impl RecentCityStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Current list; missing or unparseable data reads as empty.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(RECENT_CITIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read recent cities");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(cities) => cities,
            Err(err) => {
                warn!(error = %err, "recent cities are malformed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Move `city` to the front, dropping any case-insensitive duplicate, and
    /// persist the list truncated to [`MAX_RECENT_CITIES`].
    pub fn record(&mut self, city: &str) -> Result<()> {
        let lower = city.to_lowercase();

        let mut cities = self.list();
        cities.retain(|c| c.to_lowercase() != lower);
        cities.insert(0, city.to_string());
        cities.truncate(MAX_RECENT_CITIES);

        let json =
            serde_json::to_string(&cities).context("Failed to serialize recent cities")?;
        self.store.set(RECENT_CITIES_KEY, &json)
    }

    pub fn chips(&self) -> RecentChips {
        let cities = self.list();
        if cities.is_empty() {
            RecentChips::Placeholder("No recent searches")
        } else {
            RecentChips::Cities(cities)
        }
    }
}
