// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.
//!
//! Every field has a default, so front ends only need to send the values
//! they want to override (`{ "dwellMs": 600 }` from JavaScript, or a single
//! environment variable in the replay tool).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Edge length of one block, in group-local units.
pub const DEFAULT_CELL_SIZE: f64 = 2.0;
/// How long a target must be held before the action fires.
pub const DEFAULT_DWELL_MS: f64 = 800.0;
pub const DEFAULT_ROTATION_SPEED: f64 = 4.0;
pub const DEFAULT_PAN_SPEED: f64 = 40.0;
pub const DEFAULT_CAMERA_RADIUS: f64 = 40.0;
pub const DEFAULT_FOV_DEGREES: f64 = 75.0;
pub const DEFAULT_MIN_SCALE: f64 = 0.2;
pub const DEFAULT_MAX_SCALE: f64 = 5.0;
/// Fraction of the remaining distance the smoothed pointer covers per frame.
pub const DEFAULT_SMOOTHING: f64 = 0.5;
/// Storage slot the block list is written to.
pub const DEFAULT_STORAGE_KEY: &str = "myARBlocks";
pub const DEFAULT_COLOR: u32 = 0xFF3333;
pub const DEFAULT_RING_RADIUS_PX: f64 = 30.0;

/// Thresholds for the gesture classifier, as fractions of hand size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
    /// Fingertips closer than this are "together".
    pub close_ratio: f64,
    /// Index and middle tips at least this far apart are "spread".
    pub far_ratio: f64,
    /// Thumb tip further than this from the index knuckle forms an "L".
    pub thumb_spread_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            close_ratio: 0.6,
            far_ratio: 0.9,
            thumb_spread_ratio: 0.8,
        }
    }
}

/// Tunables for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub cell_size: f64,
    pub dwell_ms: f64,
    pub rotation_speed: f64,
    pub pan_speed: f64,
    pub camera_radius: f64,
    /// Vertical field of view of the render camera.
    pub fov_degrees: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub smoothing: f64,
    /// Depth of the invisible back wall blocks can be attached to.
    ///
    /// Half a cell behind the origin, so a block built on the wall lands in
    /// the same depth layer as the first block.
    pub back_wall_z: f64,
    pub storage_key: String,
    pub default_color: u32,
    pub ring_radius_px: f64,
    pub classifier: ClassifierConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            dwell_ms: DEFAULT_DWELL_MS,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            pan_speed: DEFAULT_PAN_SPEED,
            camera_radius: DEFAULT_CAMERA_RADIUS,
            fov_degrees: DEFAULT_FOV_DEGREES,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            smoothing: DEFAULT_SMOOTHING,
            back_wall_z: -DEFAULT_CELL_SIZE / 2.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_color: DEFAULT_COLOR,
            ring_radius_px: DEFAULT_RING_RADIUS_PX,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Checks that every value is usable by the engine.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        }

        positive("cellSize", self.cell_size)?;
        positive("dwellMs", self.dwell_ms)?;
        positive("rotationSpeed", self.rotation_speed)?;
        positive("panSpeed", self.pan_speed)?;
        positive("cameraRadius", self.camera_radius)?;
        positive("minScale", self.min_scale)?;
        positive("maxScale", self.max_scale)?;
        positive("ringRadiusPx", self.ring_radius_px)?;

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(Error::InvalidConfig(format!(
                "fovDegrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(Error::InvalidConfig(format!(
                "minScale {} exceeds maxScale {}",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be in (0, 1], got {}",
                self.smoothing
            )));
        }
        if !self.back_wall_z.is_finite() {
            return Err(Error::InvalidConfig("backWallZ must be finite".into()));
        }
        if self.default_color > 0xFF_FFFF {
            return Err(Error::InvalidConfig(format!(
                "defaultColor {:#x} is not a 24-bit RGB value",
                self.default_color
            )));
        }
        if self.storage_key.is_empty() {
            return Err(Error::InvalidConfig("storageKey must not be empty".into()));
        }

        let c = &self.classifier;
        positive("classifier.closeRatio", c.close_ratio)?;
        positive("classifier.farRatio", c.far_ratio)?;
        positive("classifier.thumbSpreadRatio", c.thumb_spread_ratio)?;
        if c.close_ratio >= c.far_ratio {
            return Err(Error::InvalidConfig(format!(
                "classifier.closeRatio {} must be below farRatio {}",
                c.close_ratio, c.far_ratio
            )));
        }

        Ok(())
    }
}
