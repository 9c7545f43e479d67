use crate::history::HistoryList;
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Well-known name of the history slot.
pub const STORAGE_KEY: &str = "weather_lookup_history";

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage is unavailable")]
    Unavailable,
}

/// A single durable location holding the serialized history list.
///
/// Reads never fail: an absent or unreadable value is an empty list.
pub trait PersistentSlot {
    fn read(&self) -> HistoryList;

    /// Replaces the stored value with `list`.
    fn write(&self, list: &HistoryList) -> Result<(), SlotError>;

    /// Deletes the stored value. Removing an absent value succeeds.
    fn remove(&self) -> Result<(), SlotError>;
}

/// Slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/lazyweather/weather_lookup_history.json`
    pub fn default_path() -> Option<PathBuf> {
        let data_dir = dirs::data_dir()?;
        Some(data_dir.join("lazyweather").join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SlotError {
        SlotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistentSlot for FileSlot {
    fn read(&self) -> HistoryList {
        if !self.path.exists() {
            return HistoryList::new();
        }

        match fs::read_to_string(&self.path) {
            Ok(json) => match HistoryList::from_json(&json) {
                Ok(list) => list,
                Err(e) => {
                    // Corrupted slot, the next write overwrites it
                    info!("Failed to deserialize history file {:?}: {}", self.path, e);
                    HistoryList::new()
                }
            },
            Err(e) => {
                info!("Failed to read history file {:?}: {}", self.path, e);
                HistoryList::new()
            }
        }
    }

    fn write(&self, list: &HistoryList) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = list.to_json()?;

        // Write to temp file first
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|source| SlotError::Io {
            path: temp_path.clone(),
            source,
        })?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), SlotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Slot that lives only as long as the process.
///
/// Keeps the serialized form so corrupt values and unavailable storage can be
/// reproduced.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: RefCell<Option<String>>,
    unavailable: Cell<bool>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `raw` as the stored value, whether or not it parses.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(raw.into())),
            unavailable: Cell::new(false),
        }
    }

    /// Makes every write and remove fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// The stored value as written, if any.
    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Replaces the stored value without going through a store, like another
    /// process writing to the same location.
    pub fn set_raw(&self, raw: Option<String>) {
        *self.value.borrow_mut() = raw;
    }
}

impl PersistentSlot for MemorySlot {
    fn read(&self) -> HistoryList {
        let value = self.value.borrow();
        let Some(json) = value.as_deref() else {
            return HistoryList::new();
        };

        HistoryList::from_json(json).unwrap_or_else(|e| {
            info!("Failed to deserialize stored history: {}", e);
            HistoryList::new()
        })
    }

    fn write(&self, list: &HistoryList) -> Result<(), SlotError> {
        if self.unavailable.get() {
            return Err(SlotError::Unavailable);
        }
        *self.value.borrow_mut() = Some(list.to_json()?);
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        if self.unavailable.get() {
            return Err(SlotError::Unavailable);
        }
        *self.value.borrow_mut() = None;
        Ok(())
    }
}

impl<S: PersistentSlot + ?Sized> PersistentSlot for std::rc::Rc<S> {
    fn read(&self) -> HistoryList {
        (**self).read()
    }

    fn write(&self, list: &HistoryList) -> Result<(), SlotError> {
        (**self).write(list)
    }

    fn remove(&self) -> Result<(), SlotError> {
        (**self).remove()
    }
}
