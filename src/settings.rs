use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write settings: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Opaque persisted-settings store as the session sees it: one binary brush
/// blob, a synchronous save and a fire-and-forget delayed save. The session
/// never awaits the delayed save; scheduling belongs to the store's owner.
pub trait SettingsStore {
    /// The persisted brush blob, if any was ever written.
    fn brush_blob(&self) -> Option<&[u8]>;

    /// Replace the persisted brush blob.
    fn set_brush_blob(&mut self, blob: Vec<u8>);

    /// Write the store to its backing storage immediately.
    fn save_now(&mut self) -> SettingsResult<()>;

    /// Request a write at the owner's convenience.
    fn save_delayed(&mut self);
}

/// On-disk settings file body. New fields get defaults when reading old files.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
struct SettingsData {
    brush: Option<Vec<u8>>,
}

/// JSON-file-backed settings store.
///
/// Loading is fail-soft: an unreadable or malformed file logs a warning and
/// starts from defaults, so the worst case is a session with a default brush.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    data: SettingsData,
    dirty: bool,
}

impl JsonSettingsStore {
    /// Load the store from `path`, substituting defaults on any failure.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => data,
                Err(err) => {
                    log::warn!("Malformed settings file {}: {}", path.display(), err);
                    SettingsData::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SettingsData::default(),
            Err(err) => {
                log::warn!("Failed to read settings file {}: {}", path.display(), err);
                SettingsData::default()
            }
        };
        Self {
            path,
            data,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a delayed save was requested and not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush a pending delayed save, if any. The app shell calls this from
    /// its own idle/shutdown hooks.
    pub fn flush_if_dirty(&mut self) -> SettingsResult<()> {
        if self.dirty {
            self.save_now()?;
        }
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn brush_blob(&self) -> Option<&[u8]> {
        self.data.brush.as_deref()
    }

    fn set_brush_blob(&mut self, blob: Vec<u8>) {
        self.data.brush = Some(blob);
    }

    fn save_now(&mut self) -> SettingsResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        self.dirty = false;
        log::debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    fn save_delayed(&mut self) {
        self.dirty = true;
    }
}
