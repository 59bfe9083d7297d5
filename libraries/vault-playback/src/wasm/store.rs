//! `StateStore` over `window.localStorage`

use crate::error::{PlaybackError, Result};
use crate::store::{decode_snapshot, encode_snapshot, PlayerSnapshot, StateStore};
use web_sys::{window, Storage};

/// Snapshot kept as JSON text under one local storage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }
}

impl StateStore for LocalStorageStore {
    fn load(&self) -> Option<PlayerSnapshot> {
        let raw = Self::storage()?.get_item(&self.key).ok()??;
        decode_snapshot(&raw)
    }

    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<()> {
        let storage =
            Self::storage().ok_or_else(|| PlaybackError::storage("localStorage unavailable"))?;
        let raw = encode_snapshot(snapshot)?;
        storage
            .set_item(&self.key, &raw)
            .map_err(|e| PlaybackError::storage(format!("setItem failed: {:?}", e)))
    }
}
