//! Persistence for user override maps
//!
//! The merchant lexicon and the categorizer each keep a small map of user
//! corrections keyed by normalized merchant text. The map is loaded whole when
//! the owner is constructed and written back whole after every change.
//!
//! A store that can't be read or parsed loads as empty; a corrupted file must
//! never stop receipts from being processed.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// File name of the merchant-name override store inside the data dir
pub const MERCHANT_OVERRIDES_FILE: &str = "merchant_overrides.json";

/// File name of the category override store inside the data dir
pub const CATEGORY_OVERRIDES_FILE: &str = "category_overrides.json";

/// Key-value persistence for an override map
pub trait OverrideStore: Send + Sync {
    /// Load every entry. Missing or malformed data yields an empty map.
    fn load(&self) -> HashMap<String, String>;

    /// Replace the stored map with `entries`
    fn save(&self, entries: &HashMap<String, String>) -> Result<()>;
}

impl<T: OverrideStore + ?Sized> OverrideStore for Arc<T> {
    fn load(&self) -> HashMap<String, String> {
        (**self).load()
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        (**self).save(entries)
    }
}

impl<T: OverrideStore + ?Sized> OverrideStore for Box<T> {
    fn load(&self) -> HashMap<String, String> {
        (**self).load()
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        (**self).save(entries)
    }
}

/// In-memory store, for tests and embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of what was last saved
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OverrideStore for MemoryStore {
    fn load(&self) -> HashMap<String, String> {
        self.snapshot()
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        *self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = entries.clone();
        Ok(())
    }
}

/// JSON object on disk (`{"normalized key": "value", ...}`)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Merchant-name overrides inside `data_dir`
    pub fn merchant_overrides(data_dir: &Path) -> Self {
        Self::new(data_dir.join(MERCHANT_OVERRIDES_FILE))
    }

    /// Category overrides inside `data_dir`
    pub fn category_overrides(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CATEGORY_OVERRIDES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OverrideStore for JsonFileStore {
    fn load(&self) -> HashMap<String, String> {
        if !self.path.exists() {
            debug!("No override store at {}", self.path.display());
            return HashMap::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Could not read override store {}: {} (starting empty)",
                    self.path.display(),
                    e
                );
                return HashMap::new();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(entries) => {
                debug!(
                    "Loaded {} overrides from {}",
                    entries.len(),
                    self.path.display()
                );
                entries
            }
            Err(e) => {
                warn!(
                    "Malformed override store {}: {} (starting empty)",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Sorted keys keep the file diffable
        let sorted: BTreeMap<&String, &String> = entries.iter().collect();

        // Write to a sibling temp file, then rename over the target
        let mut temp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut temp, &sorted)?;
        temp.write_all(b"\n")?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Saved {} overrides to {}", entries.len(), self.path.display());
        Ok(())
    }
}
