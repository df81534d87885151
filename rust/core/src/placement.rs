// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Where a pointer ray would put or remove a block.
//!
//! - **First placement** (no blocks yet): the ray meets the start plane
//!   through the origin; the hit snaps to the grid on the `z = 0` layer.
//! - **Attach**: the ray meets the nearest of the back wall and the existing
//!   blocks. The hit point is pushed half a cell out along the surface
//!   normal before snapping, so the new block sits flush against the face
//!   it was built on. If nothing is hit, a fallback plane parallel to the
//!   start plane is used with a +z normal.
//! - **Erase**: the ray meets existing blocks only; the nearest block is the
//!   candidate.
//!
//! The back wall and fallback plane live in the building group's frame, so
//! wall-attached blocks land on the same depth layer at any structure scale.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::blocks::{Block, BlockCollection, BlockKey};
use crate::config::EngineConfig;
use crate::geometry::{GeometryQuery, Plane, Ray};
use crate::grid::GridCell;
use crate::palette::Rgb;

/// Half the side of the (finite) back wall, in group-local units.
pub const BACK_WALL_HALF_EXTENT: f64 = 5_000.0;

/// Relative distance within which a wall hit counts as level with a block
/// hit. The wall is coplanar with the back faces of depth-0 blocks; ties go
/// to the block.
const WALL_TIE_TOLERANCE: f64 = 1e-9;

/// How an install target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// Empty structure, start plane.
    First,
    /// Built against a block face.
    BlockFace(BlockKey),
    /// Built against the back wall.
    BackWall,
    /// Nothing hit; fallback plane.
    Fallback,
}

/// Candidate cell for a new block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstallTarget {
    pub cell: GridCell,
    /// World-space point the ray hit, for the cursor.
    pub hit_point: Point3<f64>,
    pub kind: PlacementKind,
}

/// Candidate block for deletion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseTarget {
    pub key: BlockKey,
    pub cell: GridCell,
    pub hit_point: Point3<f64>,
}

/// Result of a confirmed install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Placed(BlockKey),
    /// The cell was already taken; nothing changed.
    Occupied,
}

/// Placement rules for one grid configuration.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    cell_size: f64,
    start_plane: Plane,
    wall_depth: f64,
}

impl PlacementEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            start_plane: Plane::facing_z(0.0),
            wall_depth: config.back_wall_z,
        }
    }

    /// Finds the cell a new block would occupy.
    pub fn install_target<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        blocks: &BlockCollection,
        scale: f64,
    ) -> Option<InstallTarget> {
        if blocks.is_empty() {
            self.first_target(query, ray, scale)
        } else {
            self.attach_target(query, ray, blocks, scale)
        }
    }

    fn first_target<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        scale: f64,
    ) -> Option<InstallTarget> {
        let hit = query.intersect_plane(ray, &self.start_plane)?;
        let local = query.world_to_local(&hit.point, scale);
        Some(InstallTarget {
            cell: GridCell::snap(&local, self.cell_size).with_z(0),
            hit_point: hit.point,
            kind: PlacementKind::First,
        })
    }

    fn attach_target<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        blocks: &BlockCollection,
        scale: f64,
    ) -> Option<InstallTarget> {
        let wall_plane = Plane::facing_z(self.wall_depth * scale);
        let wall = query.intersect_plane(ray, &wall_plane).filter(|hit| {
            let local = query.world_to_local(&hit.point, scale);
            local.x.abs() <= BACK_WALL_HALF_EXTENT && local.y.abs() <= BACK_WALL_HALF_EXTENT
        });
        let block = query.intersect_blocks(ray, blocks, self.cell_size, scale);

        let (point, normal, kind) = match (block, wall) {
            (Some(b), Some(w))
                if w.distance + WALL_TIE_TOLERANCE * w.distance.max(1.0) < b.distance =>
            {
                (w.point, Vector3::z(), PlacementKind::BackWall)
            }
            (Some(b), _) => (b.point, b.normal, PlacementKind::BlockFace(b.key)),
            (None, Some(w)) => (w.point, Vector3::z(), PlacementKind::BackWall),
            (None, None) => {
                // the fallback plane is unbounded, unlike the wall
                let hit = query.intersect_plane(ray, &wall_plane)?;
                (hit.point, Vector3::z(), PlacementKind::Fallback)
            }
        };

        let local = query.world_to_local(&point, scale) + normal * (self.cell_size / 2.0);
        Some(InstallTarget {
            cell: GridCell::snap(&local, self.cell_size),
            hit_point: point,
            kind,
        })
    }

    /// Finds the block a delete would remove.
    pub fn erase_target<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        blocks: &BlockCollection,
        scale: f64,
    ) -> Option<EraseTarget> {
        let hit = query.intersect_blocks(ray, blocks, self.cell_size, scale)?;
        let block = blocks.get(hit.key)?;
        Some(EraseTarget {
            key: hit.key,
            cell: block.cell,
            hit_point: hit.point,
        })
    }

    /// Places a block unless its cell is already occupied.
    pub fn install(
        &self,
        blocks: &mut BlockCollection,
        cell: GridCell,
        color: Rgb,
    ) -> InstallOutcome {
        match blocks.insert(cell, color) {
            Some(key) => {
                debug!(%cell, color = %color.css_hex(), "block placed");
                InstallOutcome::Placed(key)
            }
            None => {
                debug!(%cell, "cell occupied, placement suppressed");
                InstallOutcome::Occupied
            }
        }
    }

    /// Removes a block.
    pub fn erase(&self, blocks: &mut BlockCollection, key: BlockKey) -> Option<Block> {
        let block = blocks.remove(key)?;
        debug!(cell = %block.cell, "block removed");
        Some(block)
    }
}
