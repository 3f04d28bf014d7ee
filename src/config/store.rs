//! In-memory configuration store.
//!
//! A [`ConfigStore`] is constructed once at process start and passed by
//! reference to whatever needs it. Loading is lazy: the first
//! [`ConfigStore::initialize`] or the first read loads the file, and later
//! calls reuse the cached sections until [`ConfigStore::reinitialize`] is
//! invoked.
//!
//! The cache is a single-threaded cell, so the store is `!Sync` and cannot
//! be initialized concurrently from several threads.

use super::defaults::{DEFAULT_CONFIG_PATH, MAX_CONFIG_FILE_BYTES, MODELS_SECTION};
use super::ini::{self, Sections};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One entry of the `[models]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub name: String,
    pub model_id: String,
}

struct LoadedConfig {
    source_path: PathBuf,
    sections: Sections,
}

impl LoadedConfig {
    fn read(path: &Path) -> Result<Self> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigFileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        if !metadata.is_file() {
            return Err(Error::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }

        if metadata.len() > MAX_CONFIG_FILE_BYTES {
            return Err(Error::ConfigParse {
                path: path.to_path_buf(),
                line: 0,
                message: format!(
                    "file is {} bytes, exceeds limit of {} bytes",
                    metadata.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let sections = ini::parse(&content, path)?;

        Ok(Self {
            source_path: path.to_path_buf(),
            sections,
        })
    }
}

pub struct ConfigStore {
    default_path: PathBuf,
    loaded: OnceCell<LoadedConfig>,
}

// Values may be plaintext credentials or the decryption key, so only
// section and key names are printed.
impl fmt::Debug for LoadedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: IndexMap<&str, Vec<&str>> = self
            .sections
            .iter()
            .map(|(section, entries)| {
                (section.as_str(), entries.keys().map(String::as_str).collect())
            })
            .collect();
        f.debug_struct("LoadedConfig")
            .field("source_path", &self.source_path)
            .field("keys", &keys)
            .finish()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("default_path", &self.default_path)
            .field("loaded", &self.loaded.get())
            .finish()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigStore {
    /// Create an unloaded store that reads `default_path` on first access.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// Create a store and load `path` immediately.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        let path = store.default_path.clone();
        store.initialize(&path)?;
        Ok(store)
    }

    /// Load `path` unless the store is already initialized.
    ///
    /// Returns `true` when this call read the file and `false` when the
    /// cached configuration was kept.
    pub fn initialize(&self, path: &Path) -> Result<bool> {
        if self.loaded.get().is_some() {
            debug!("Configuration already initialized, not re-reading {}", path.display());
            return Ok(false);
        }
        let config = LoadedConfig::read(path)?;
        info!("Configuration initialized from {}", path.display());
        let _ = self.loaded.set(config);
        Ok(true)
    }

    /// Unconditionally reload from `path`, replacing the cached state.
    pub fn reinitialize(&mut self, path: &Path) -> Result<bool> {
        let config = LoadedConfig::read(path)?;
        info!("Configuration reinitialized from {}", path.display());
        self.loaded = OnceCell::with_value(config);
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Path the cached configuration was read from, if loaded.
    pub fn source_path(&self) -> Option<&Path> {
        self.loaded.get().map(|l| l.source_path.as_path())
    }

    fn loaded(&self) -> Result<&LoadedConfig> {
        self.loaded.get_or_try_init(|| {
            let config = LoadedConfig::read(&self.default_path)?;
            info!("Configuration initialized from {}", self.default_path.display());
            Ok(config)
        })
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedConfig> {
        if self.loaded.get().is_none() {
            self.loaded = OnceCell::with_value(LoadedConfig::read(&self.default_path)?);
        }
        self.loaded.get_mut().ok_or_else(|| Error::ConfigFileNotFound {
            path: self.default_path.clone(),
        })
    }

    /// All sections in file order.
    pub fn sections(&self) -> Result<&Sections> {
        Ok(&self.loaded()?.sections)
    }

    /// Look up `key` in `section`. Keys are case-sensitive.
    pub fn get(&self, section: &str, key: &str) -> Result<&str> {
        self.get_optional(section, key)?
            .ok_or_else(|| Error::key_not_found(section, key))
    }

    /// Like [`ConfigStore::get`] but a missing key or section is `None`.
    pub fn get_optional(&self, section: &str, key: &str) -> Result<Option<&str>> {
        let value = self
            .loaded()?
            .sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str);
        debug!(section, key, found = value.is_some(), "Config lookup");
        Ok(value)
    }

    /// Set `key` in `section`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> Result<()> {
        self.loaded_mut()?
            .sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        debug!(section, key, "Config value set");
        Ok(())
    }

    /// Write every section to `path` in the format [`ConfigStore::initialize`]
    /// reads.
    ///
    /// The content goes to a temporary file in the destination directory
    /// which is then renamed over `path`, so a failure leaves no partial
    /// file behind.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = ini::render(self.sections()?);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

        info!("Configuration file saved at {}", path.display());
        Ok(())
    }

    /// Entries of the `[models]` section in file order.
    pub fn list_models(&self) -> Result<Vec<ModelEntry>> {
        let models = self
            .loaded()?
            .sections
            .get(MODELS_SECTION)
            .ok_or(Error::ModelsSectionMissing)?;
        debug!(count = models.len(), "Models retrieved from config");
        Ok(models
            .iter()
            .map(|(name, model_id)| ModelEntry {
                name: name.clone(),
                model_id: model_id.clone(),
            })
            .collect())
    }
}
