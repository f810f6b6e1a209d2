//! Persistent session config.
//!
//! Holds the `last_action` summary written after every install run. The
//! session talks to persistence only through the `ConfigStore` trait so tests
//! can substitute `MemoryConfigStore`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::X3Error;

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "multitool_config.json";

/// Persistence seam for the last-action summary
pub trait ConfigStore {
    /// Read the stored summary; `Ok(None)` when nothing has been stored yet
    fn load_last_action(&self) -> Result<Option<String>>;

    /// Overwrite the stored summary
    fn save_last_action(&mut self, summary: &str) -> Result<()>;
}

/// On-disk config record.
///
/// Keys other than `last_action` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ToolConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Save configuration to a JSON file.
    ///
    /// Writes a sibling temp file and renames it over the target so readers
    /// never observe a partial file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        let tmp_path = temp_path_for(path);
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", tmp_path))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace configuration at {:?}", path))?;

        Ok(())
    }
}

/// JSON file store with a backup of the previous contents
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
    backup_path: Option<PathBuf>,
}

impl JsonConfigStore {
    /// Store at `path`, backing up to `<stem>_backup.<ext>` before each write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_path = Some(backup_path_for(&path));
        Self { path, backup_path }
    }

    /// Store at `path` that never writes a backup
    pub fn without_backup(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_path: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    fn load_config(&self) -> Result<Option<ToolConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        ToolConfig::load_from_file(&self.path).map(Some)
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for JsonConfigStore {
    fn load_last_action(&self) -> Result<Option<String>> {
        Ok(self.load_config()?.and_then(|config| config.last_action))
    }

    fn save_last_action(&mut self, summary: &str) -> Result<()> {
        // An unreadable file is replaced; the backup still holds its bytes
        let mut config = match self.load_config() {
            Ok(existing) => existing.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Replacing unreadable config {:?}: {:#}", self.path, e);
                ToolConfig::default()
            }
        };

        if let Some(backup) = &self.backup_path {
            if self.path.exists() {
                fs::copy(&self.path, backup)
                    .with_context(|| format!("Failed to back up configuration to {:?}", backup))?;
            }
        }

        config.last_action = Some(summary.to_string());
        config.save_to_file(&self.path)?;

        tracing::info!("Saved last action to {:?}", self.path);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    last_action: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory store. Clones share state, so a test can keep a handle after
/// moving the store into an orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a summary (does not count as a write)
    pub fn with_last_action(summary: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.last_action = Some(summary.into());
        }
        store
    }

    /// Make every subsequent save fail
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Number of successful saves
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    pub fn last_action(&self) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.last_action.clone())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_last_action(&self) -> Result<Option<String>> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| X3Error::persistence(format!("memory store poisoned: {}", e)))?;
        Ok(inner.last_action.clone())
    }

    fn save_last_action(&mut self, summary: &str) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| X3Error::persistence(format!("memory store poisoned: {}", e)))?;
        if inner.fail_writes {
            return Err(X3Error::persistence("simulated write failure").into());
        }
        inner.last_action = Some(summary.to_string());
        inner.writes += 1;
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}_backup.{}", stem, ext.to_string_lossy()),
        None => format!("{}_backup", stem),
    };
    path.with_file_name(name)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}
