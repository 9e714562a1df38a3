//! Per-visit session storage.
//!
//! Holds the flags one page load leaves for the next (currently only
//! `fonts-loaded`). Storage may be unavailable, like a browser with storage
//! disabled; callers ignore the error.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Key set once the font stylesheet has been loaded.
pub const FONTS_LOADED: &str = "fonts-loaded";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("session storage is unavailable")]
pub struct SessionUnavailable;

/// Session storage shared across the page loads of one visit.
#[derive(Debug)]
pub struct Session {
    store: Option<Mutex<FxHashMap<String, String>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            store: Some(Mutex::new(FxHashMap::default())),
        }
    }

    /// Storage that rejects every access.
    pub const fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, SessionUnavailable> {
        let store = self.store.as_ref().ok_or(SessionUnavailable)?;
        Ok(store.lock().get(key).cloned())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), SessionUnavailable> {
        let store = self.store.as_ref().ok_or(SessionUnavailable)?;
        store.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
