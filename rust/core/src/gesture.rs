// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gesture classification from a single landmark frame.
//!
//! Distances between the thumb, index and middle fingertips are compared
//! against the hand's own size (wrist to middle knuckle), so the result does
//! not depend on how large the hand appears in the camera image.
//!
//! Rules are checked in a fixed priority order:
//!
//! 1. all three tips together → [`Gesture::Pan`]
//! 2. index and middle together → [`Gesture::Rotate`]
//! 3. index and middle spread → [`Gesture::Scale`] when the thumb sticks out
//!    sideways ("L" shape), otherwise [`Gesture::Install`] /
//!    [`Gesture::Eraser`]
//! 4. anything else → [`Gesture::None`]

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::landmarks::{HandLandmarks, INDEX_MCP, INDEX_TIP, MIDDLE_TIP, THUMB_TIP};

/// Hands smaller than this (in normalized image units) are treated as noise.
const MIN_HAND_SIZE: f64 = 1e-6;

/// Discrete gesture label for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    /// Three-finger grip: move the orbit target.
    Pan,
    /// Index and middle pressed together: orbit the camera.
    Rotate,
    /// "L" shape between thumb and index: resize the structure.
    Scale,
    /// Pointing with the index finger: place a block.
    Install,
    /// Pointing while the eraser is toggled on: remove a block.
    Eraser,
    /// Ambiguous pose, no action.
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::Install => "install",
            Self::Eraser => "eraser",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fingertip distances normalized by hand size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandMetrics {
    pub thumb_index: f64,
    pub thumb_middle: f64,
    pub index_middle: f64,
    /// Thumb tip to index knuckle.
    pub thumb_spread: f64,
}

impl HandMetrics {
    /// Returns `None` for a degenerate (zero-sized) hand.
    pub fn measure(hand: &HandLandmarks) -> Option<Self> {
        let size = hand.hand_size();
        if size < MIN_HAND_SIZE {
            return None;
        }
        Some(Self {
            thumb_index: hand.distance(THUMB_TIP, INDEX_TIP) / size,
            thumb_middle: hand.distance(THUMB_TIP, MIDDLE_TIP) / size,
            index_middle: hand.distance(INDEX_TIP, MIDDLE_TIP) / size,
            thumb_spread: hand.distance(THUMB_TIP, INDEX_MCP) / size,
        })
    }
}

/// Maps landmark frames to gestures.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies one hand. `eraser` selects [`Gesture::Eraser`] over
    /// [`Gesture::Install`] for the pointing pose.
    pub fn classify(&self, hand: &HandLandmarks, eraser: bool) -> Gesture {
        match HandMetrics::measure(hand) {
            Some(metrics) => self.classify_metrics(&metrics, eraser),
            None => Gesture::None,
        }
    }

    pub fn classify_metrics(&self, m: &HandMetrics, eraser: bool) -> Gesture {
        let close = self.config.close_ratio;
        let far = self.config.far_ratio;

        if m.thumb_index < close && m.thumb_middle < close && m.index_middle < close {
            Gesture::Pan
        } else if m.index_middle < close {
            Gesture::Rotate
        } else if m.index_middle >= far {
            if m.thumb_spread > self.config.thumb_spread_ratio {
                Gesture::Scale
            } else if eraser {
                Gesture::Eraser
            } else {
                Gesture::Install
            }
        } else {
            Gesture::None
        }
    }
}
