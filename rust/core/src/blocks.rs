// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The block collection.
//!
//! Blocks live in a slot map so a hover target can hold a [`BlockKey`] that
//! stays valid (and never aliases a newer block) after other blocks are
//! removed. A grid-cell index enforces one block per cell.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::grid::GridCell;
use crate::palette::Rgb;

new_key_type! {
    /// Key for a placed block.
    pub struct BlockKey;
}

/// A placed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub cell: GridCell,
    pub color: Rgb,
}

/// Blocks in insertion order, unique by grid cell.
#[derive(Debug, Default)]
pub struct BlockCollection {
    blocks: SlotMap<BlockKey, Block>,
    by_cell: FxHashMap<GridCell, BlockKey>,
    order: Vec<BlockKey>,
}

impl BlockCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block, or returns `None` if the cell is already occupied.
    pub fn insert(&mut self, cell: GridCell, color: Rgb) -> Option<BlockKey> {
        if self.by_cell.contains_key(&cell) {
            return None;
        }
        let key = self.blocks.insert(Block { cell, color });
        self.by_cell.insert(cell, key);
        self.order.push(key);
        Some(key)
    }

    /// Removes a block by key.
    pub fn remove(&mut self, key: BlockKey) -> Option<Block> {
        let block = self.blocks.remove(key)?;
        self.by_cell.remove(&block.cell);
        self.order.retain(|&k| k != key);
        Some(block)
    }

    pub fn get(&self, key: BlockKey) -> Option<&Block> {
        self.blocks.get(key)
    }

    /// Returns the key of the block occupying `cell`.
    pub fn key_at(&self, cell: GridCell) -> Option<BlockKey> {
        self.by_cell.get(&cell).copied()
    }

    pub fn contains_cell(&self, cell: GridCell) -> bool {
        self.by_cell.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockKey, &Block)> + '_ {
        self.order.iter().map(move |&k| (k, &self.blocks[k]))
    }

    /// Removes every block, returning them in insertion order.
    pub fn clear(&mut self) -> Vec<Block> {
        let removed = self.order.iter().map(|&k| self.blocks[k]).collect();
        self.blocks.clear();
        self.by_cell.clear();
        self.order.clear();
        removed
    }
}
