//! Single-slot persistence for the song collection.
//!
//! The whole collection is stored as one JSON array under one key. Loading
//! never fails: a missing slot, an unreadable slot, or a malformed payload
//! all yield an empty collection, with a diagnostic in the log.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;

use super::models::{FruitTheme, Song};
use super::saturate_count;
use crate::errors::AppError;

/// A single key-value slot holding a serialized payload.
pub trait StorageSlot: Send {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, AppError>;

    /// Overwrites the slot with `payload`.
    fn write(&self, payload: &str) -> Result<(), AppError>;
}

impl<S: StorageSlot + ?Sized> StorageSlot for Box<S> {
    fn read(&self) -> Result<Option<String>, AppError> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> Result<(), AppError> {
        (**self).write(payload)
    }
}

/// Slot backed by `<dir>/<key>.json`.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path, key: &str) -> Result<Self, AppError> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(Self {
            path: dir.join(format!("{}.json", key)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, payload: &str) -> Result<(), AppError> {
        // Replace atomically so a crash mid-write cannot leave half a payload behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemorySlot {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(payload: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    #[cfg(test)]
    pub(crate) fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, AppError> {
        Ok(self.contents.lock().clone())
    }

    fn write(&self, payload: &str) -> Result<(), AppError> {
        *self.contents.lock() = Some(payload.to_string());
        Ok(())
    }
}

/// Reads the collection from `slot`, never failing.
pub fn load<S: StorageSlot + ?Sized>(slot: &S) -> Vec<Song> {
    match slot.read() {
        Ok(Some(payload)) => parse_collection(&payload),
        Ok(None) => {
            log::info!("[Storage] No saved songs, starting empty");
            Vec::new()
        }
        Err(e) => {
            log::error!("[Storage] Failed to read saved songs: {}", e);
            Vec::new()
        }
    }
}

/// Serializes and writes the entire collection to `slot`.
pub fn save<S: StorageSlot + ?Sized>(slot: &S, songs: &[Song]) -> Result<(), AppError> {
    let payload = serde_json::to_string(songs)?;
    slot.write(&payload)
}

/// A song as found in storage, before its count is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSong {
    id: String,
    date: String,
    title: String,
    theme: FruitTheme,
    practice_count: i64,
    #[serde(default)]
    memo: String,
}

impl StoredSong {
    fn into_song(self) -> Song {
        let practice_count = saturate_count(self.practice_count);
        if i64::from(practice_count) != self.practice_count {
            log::warn!(
                "[Storage] Song {} had practiceCount {}, saturating to {}",
                self.id,
                self.practice_count,
                practice_count
            );
        }
        Song {
            id: self.id,
            date: self.date,
            title: self.title,
            theme: self.theme,
            practice_count,
            memo: self.memo,
        }
    }
}

/// Parses a stored payload. Malformed input yields an empty collection.
pub fn parse_collection(payload: &str) -> Vec<Song> {
    let stored: Vec<StoredSong> = match serde_json::from_str(payload) {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("[Storage] Failed to parse songs: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    stored
        .into_iter()
        .filter_map(|raw| {
            if !seen.insert(raw.id.clone()) {
                log::warn!("[Storage] Dropping duplicate song id {}", raw.id);
                return None;
            }
            Some(raw.into_song())
        })
        .collect()
}
