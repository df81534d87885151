// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hand landmark frames.
//!
//! A hand is 21 keypoints in the layout used by common hand-tracking models
//! (wrist, then four joints per finger from thumb to pinky). Coordinates are
//! normalized to the video frame: `x` and `y` in `[0, 1]`, origin top-left.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of keypoints in one hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;

/// One detected hand for one video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct HandLandmarks {
    points: [Point2<f64>; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Builds a hand from 21 points, rejecting non-finite coordinates.
    pub fn new(points: [Point2<f64>; LANDMARK_COUNT]) -> Result<Self> {
        if let Some(i) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(Error::NonFiniteLandmark(i));
        }
        Ok(Self { points })
    }

    /// Parses a flat coordinate buffer.
    ///
    /// Accepts `x, y` pairs (42 values) or `x, y, z` triples (63 values); the
    /// depth component is ignored.
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        let stride = match values.len() {
            n if n == LANDMARK_COUNT * 2 => 2,
            n if n == LANDMARK_COUNT * 3 => 3,
            n => {
                return Err(Error::LandmarkCount {
                    expected: LANDMARK_COUNT * 2,
                    actual: n,
                })
            }
        };

        let mut points = [Point2::origin(); LANDMARK_COUNT];
        for (point, chunk) in points.iter_mut().zip(values.chunks_exact(stride)) {
            *point = Point2::new(chunk[0], chunk[1]);
        }
        Self::new(points)
    }

    /// Returns the keypoint at `index` (see the index constants).
    #[inline]
    pub fn point(&self, index: usize) -> Point2<f64> {
        self.points[index]
    }

    pub fn points(&self) -> &[Point2<f64>; LANDMARK_COUNT] {
        &self.points
    }

    /// Planar distance between two keypoints.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        nalgebra::distance(&self.points[a], &self.points[b])
    }

    /// The fingertip used as the pointer.
    pub fn index_tip(&self) -> Point2<f64> {
        self.points[INDEX_TIP]
    }

    /// Thumb tip to index tip distance, the scale gesture's pinch measure.
    pub fn pinch_distance(&self) -> f64 {
        self.distance(THUMB_TIP, INDEX_TIP)
    }

    /// Wrist to middle-finger knuckle, the reference length for the classifier.
    pub fn hand_size(&self) -> f64 {
        self.distance(WRIST, MIDDLE_MCP)
    }

    /// Returns a copy with every coordinate scaled about `center`.
    pub fn scaled_about(&self, center: Point2<f64>, factor: f64) -> Self {
        let mut points = self.points;
        for p in points.iter_mut() {
            *p = center + (*p - center) * factor;
        }
        Self { points }
    }
}

impl TryFrom<Vec<[f64; 2]>> for HandLandmarks {
    type Error = Error;

    fn try_from(value: Vec<[f64; 2]>) -> Result<Self> {
        if value.len() != LANDMARK_COUNT {
            return Err(Error::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: value.len(),
            });
        }
        let mut points = [Point2::origin(); LANDMARK_COUNT];
        for (point, [x, y]) in points.iter_mut().zip(value) {
            *point = Point2::new(x, y);
        }
        Self::new(points)
    }
}

impl From<HandLandmarks> for Vec<[f64; 2]> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.iter().map(|p| [p.x, p.y]).collect()
    }
}
