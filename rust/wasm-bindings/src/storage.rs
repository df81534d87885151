// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser-side block storage.

use blockhand_core::{BlockStore, Error, MemoryStore, Result};
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::utils::console_warn;

fn storage_error(op: &str, e: JsValue) -> Error {
    Error::Storage(format!("localStorage {op} failed: {e:?}"))
}

/// `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` when the page has no window or storage is disabled.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl BlockStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| storage_error("read", e))
    }

    fn save(&mut self, key: &str, data: &str) -> Result<()> {
        self.storage
            .set_item(key, data)
            .map_err(|e| storage_error("write", e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| storage_error("remove", e))
    }
}

/// `localStorage` when available, otherwise blocks live only as long as the
/// page.
pub enum BrowserStore {
    Local(LocalStorageStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn detect() -> Self {
        match LocalStorageStore::open() {
            Some(store) => Self::Local(store),
            None => {
                console_warn("localStorage unavailable, blocks will not be saved");
                Self::Memory(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl BlockStore for BrowserStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Local(s) => s.load(key),
            Self::Memory(s) => s.load(key),
        }
    }

    fn save(&mut self, key: &str, data: &str) -> Result<()> {
        match self {
            Self::Local(s) => s.save(key, data),
            Self::Memory(s) => s.save(key, data),
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self {
            Self::Local(s) => s.remove(key),
            Self::Memory(s) => s.remove(key),
        }
    }
}
