// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer grid cells and snapping.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A block-sized cell of the building grid, in whole-cell units.
///
/// The cell `(1, 0, -2)` with a cell size of 2.0 is centered at the local
/// point `(2.0, 0.0, -4.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Snaps a group-local point to the nearest cell on each axis.
    pub fn snap(point: &Point3<f64>, cell_size: f64) -> Self {
        Self {
            x: snap_axis(point.x, cell_size),
            y: snap_axis(point.y, cell_size),
            z: snap_axis(point.z, cell_size),
        }
    }

    /// Center of the cell in group-local units.
    pub fn center(&self, cell_size: f64) -> Point3<f64> {
        Point3::new(
            self.x as f64 * cell_size,
            self.y as f64 * cell_size,
            self.z as f64 * cell_size,
        )
    }

    /// Returns the same cell moved onto the depth layer `z`.
    pub fn with_z(self, z: i32) -> Self {
        Self { z, ..self }
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[inline]
fn snap_axis(value: f64, cell_size: f64) -> i32 {
    (value / cell_size).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn snaps_drifted_hit_to_nearest_cell() {
        let cell = GridCell::snap(&Point3::new(2.08, 1.95, 0.02), 2.0);
        assert_eq!(cell, GridCell::new(1, 1, 0));

        let center = cell.center(2.0);
        assert_relative_eq!(center.x, 2.0);
        assert_relative_eq!(center.y, 2.0);
        assert_relative_eq!(center.z, 0.0);
    }

    #[test]
    fn snapping_a_center_is_idempotent() {
        for cell in [GridCell::new(0, 0, 0), GridCell::new(-3, 7, 2), GridCell::new(5, -1, -4)] {
            assert_eq!(GridCell::snap(&cell.center(2.0), 2.0), cell);
        }
    }

    #[test]
    fn negative_coordinates_round_to_nearest() {
        assert_eq!(GridCell::snap(&Point3::new(-2.9, -1.1, -0.9), 2.0), GridCell::new(-1, -1, 0));
    }

    #[test]
    fn with_z_keeps_the_plane_position() {
        assert_eq!(GridCell::new(3, 4, 9).with_z(0), GridCell::new(3, 4, 0));
    }
}
