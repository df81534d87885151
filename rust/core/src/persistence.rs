// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Saving and restoring the block collection.
//!
//! The stored form is a JSON array of `{x, y, z, color}` records, positions
//! in group-local units (multiples of the cell size), written wholesale to a
//! single named slot. Persistence is best-effort: failures are logged and
//! never interrupt the frame loop.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::blocks::{Block, BlockCollection};
use crate::error::{Error, Result};
use crate::grid::GridCell;
use crate::palette::Rgb;

/// One stored block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: u32,
}

impl BlockRecord {
    pub fn from_block(block: &Block, cell_size: f64) -> Self {
        let p = block.cell.center(cell_size);
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            color: block.color.value(),
        }
    }

    /// Grid cell of the record; off-grid positions snap to the nearest cell.
    pub fn cell(&self, cell_size: f64) -> GridCell {
        GridCell::snap(&nalgebra::Point3::new(self.x, self.y, self.z), cell_size)
    }
}

/// Serializes every block, in collection order.
pub fn encode(blocks: &BlockCollection, cell_size: f64) -> Result<String> {
    let records: Vec<BlockRecord> = blocks
        .iter()
        .map(|(_, block)| BlockRecord::from_block(block, cell_size))
        .collect();
    serde_json::to_string(&records).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parses a stored block list.
pub fn decode(json: &str) -> Result<Vec<BlockRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Rebuilds a collection from records. Records landing on an occupied cell
/// are skipped; returns how many were skipped.
pub fn restore(records: &[BlockRecord], cell_size: f64, blocks: &mut BlockCollection) -> usize {
    records
        .iter()
        .filter(|r| {
            blocks
                .insert(r.cell(cell_size), Rgb::new(r.color))
                .is_none()
        })
        .count()
}

/// A named string slot (browser `localStorage`, a file, memory).
pub trait BlockStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, data: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl BlockStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &str) -> Result<()> {
        self.slots.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Loads the stored collection. Missing or unreadable data yields an empty
/// collection.
pub fn load_blocks<S: BlockStore + ?Sized>(
    store: &S,
    key: &str,
    cell_size: f64,
) -> BlockCollection {
    let mut blocks = BlockCollection::new();

    let data = match store.load(key) {
        Ok(Some(data)) => data,
        Ok(None) => return blocks,
        Err(e) => {
            warn!(key, error = %e, "could not read stored blocks, starting empty");
            return blocks;
        }
    };

    match decode(&data) {
        Ok(records) => {
            let skipped = restore(&records, cell_size, &mut blocks);
            if skipped > 0 {
                warn!(key, skipped, "stored blocks overlapped, duplicates dropped");
            }
            debug!(key, count = blocks.len(), "restored blocks");
        }
        Err(e) => {
            warn!(key, error = %e, "stored blocks are corrupt, starting empty");
        }
    }

    blocks
}

/// Overwrites the slot with the current collection.
pub fn save_blocks<S: BlockStore + ?Sized>(
    store: &mut S,
    key: &str,
    blocks: &BlockCollection,
    cell_size: f64,
) {
    let result = encode(blocks, cell_size).and_then(|data| store.save(key, &data));
    match result {
        Ok(()) => debug!(key, count = blocks.len(), "saved blocks"),
        Err(e) => warn!(key, error = %e, "could not save blocks"),
    }
}

/// Erases the slot.
pub fn clear_blocks<S: BlockStore + ?Sized>(store: &mut S, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "could not clear stored blocks");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::palette::SWATCHES;

    /// A store whose every operation fails.
    #[derive(Debug, Default)]
    pub(crate) struct BrokenStore;

    impl BlockStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("quota exceeded".into()))
        }
        fn save(&mut self, _key: &str, _data: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
    }

    fn pairs(blocks: &BlockCollection) -> Vec<(GridCell, Rgb)> {
        let mut v: Vec<_> = blocks.iter().map(|(_, b)| (b.cell, b.color)).collect();
        v.sort_by_key(|(cell, _)| *cell);
        v
    }

    #[test]
    fn round_trip_preserves_positions_and_colors() {
        let mut blocks = BlockCollection::new();
        for (i, color) in SWATCHES.iter().enumerate() {
            let i = i as i32;
            blocks.insert(GridCell::new(i - 3, i % 2, -i), *color).unwrap();
        }
        let expected = pairs(&blocks);

        let mut store = MemoryStore::new();
        save_blocks(&mut store, "slot", &blocks, 2.0);
        blocks.clear();
        assert!(blocks.is_empty());

        let restored = load_blocks(&store, "slot", 2.0);
        assert_eq!(restored.len(), SWATCHES.len());
        assert_eq!(pairs(&restored), expected);
    }

    #[test]
    fn records_use_local_units() {
        let mut blocks = BlockCollection::new();
        blocks.insert(GridCell::new(1, -1, 0), Rgb::new(0x00FF00));
        let json = encode(&blocks, 2.0).unwrap();
        let records = decode(&json).unwrap();
        assert_eq!(
            records,
            vec![BlockRecord {
                x: 2.0,
                y: -2.0,
                z: 0.0,
                color: 0x00FF00
            }]
        );
    }

    #[test]
    fn drifted_records_snap_and_dedupe() {
        let json = r#"[
            {"x": 2.04, "y": 0.0, "z": 0.0, "color": 255},
            {"x": 1.97, "y": 0.02, "z": -0.05, "color": 65280},
            {"x": 4.0, "y": 0.0, "z": 0.0, "color": 16711680}
        ]"#;
        let mut store = MemoryStore::new();
        store.save("slot", json).unwrap();

        let blocks = load_blocks(&store, "slot", 2.0);
        assert_eq!(blocks.len(), 2);
        let first = blocks.get(blocks.key_at(GridCell::new(1, 0, 0)).unwrap()).unwrap();
        assert_eq!(first.color, Rgb::new(255));
    }

    #[test]
    fn corrupt_or_missing_data_starts_empty() {
        let mut store = MemoryStore::new();
        assert!(load_blocks(&store, "slot", 2.0).is_empty());

        store.save("slot", "{not json").unwrap();
        assert!(load_blocks(&store, "slot", 2.0).is_empty());

        store.save("slot", r#"[{"x": 1}]"#).unwrap();
        assert!(load_blocks(&store, "slot", 2.0).is_empty());

        assert!(load_blocks(&BrokenStore, "slot", 2.0).is_empty());
    }

    #[test]
    fn failed_writes_are_swallowed() {
        let mut blocks = BlockCollection::new();
        blocks.insert(GridCell::new(0, 0, 0), Rgb::RED);
        save_blocks(&mut BrokenStore, "slot", &blocks, 2.0);
        clear_blocks(&mut BrokenStore, "slot");
    }

    #[test]
    fn clear_removes_the_slot() {
        let mut store = MemoryStore::new();
        store.save("slot", "[]").unwrap();
        clear_blocks(&mut store, "slot");
        assert!(store.get("slot").is_none());
    }
}
