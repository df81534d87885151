// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fingertip → screen pointer mapping and jitter smoothing.

use nalgebra::{Point2, Vector2};

use crate::view::CameraFacing;

/// Maps a normalized video coordinate to device coordinates (`[-1, 1]`,
/// +y up), flipping x when the feed is shown mirrored.
pub fn to_ndc(tip: &Point2<f64>, facing: CameraFacing) -> Vector2<f64> {
    let x = if facing.is_mirrored() {
        (1.0 - tip.x) * 2.0 - 1.0
    } else {
        tip.x * 2.0 - 1.0
    };
    let y = (1.0 - tip.y) * 2.0 - 1.0;
    Vector2::new(x, y)
}

/// Exponential smoothing of the pointer across frames.
#[derive(Debug, Clone)]
pub struct PointerSmoother {
    factor: f64,
    current: Option<Vector2<f64>>,
}

impl PointerSmoother {
    /// `factor` is the fraction of the gap closed per frame (1.0 = no
    /// smoothing).
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            current: None,
        }
    }

    /// Moves toward `target` and returns the smoothed position. The first
    /// sample after a reset is taken as-is.
    pub fn update(&mut self, target: Vector2<f64>) -> Vector2<f64> {
        let next = match self.current {
            Some(old) => old + (target - old) * self.factor,
            None => target,
        };
        self.current = Some(next);
        next
    }

    pub fn current(&self) -> Option<Vector2<f64>> {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
