// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D overlay drawn over the video: hand skeleton, dwell ring, placement
//! flash and the guide line. Everything here is in canvas pixels.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Point2;
use serde::Serialize;

use crate::landmarks::HandLandmarks;
use crate::palette::Rgb;

/// Landmark pairs joined by bones when drawing a hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width / height, falling back to 1 for an empty canvas.
    pub fn aspect(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn to_pixels(&self, p: &Point2<f64>) -> [f64; 2] {
        [p.x * self.width, p.y * self.height]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

/// Keypoints and bones of the tracked hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skeleton {
    pub points: Vec<[f64; 2]>,
    pub connections: &'static [(usize, usize)],
}

impl Skeleton {
    pub fn new(hand: &HandLandmarks, viewport: &Viewport) -> Self {
        Self {
            points: hand.points().iter().map(|p| viewport.to_pixels(p)).collect(),
            connections: &HAND_CONNECTIONS,
        }
    }
}

/// Radial dwell progress indicator around the fingertip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellRing {
    pub center: [f64; 2],
    pub radius: f64,
    pub progress: f64,
    /// Arc from 12 o'clock, clockwise.
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
}

impl DwellRing {
    /// Green (install) or red (erase) once complete; the block color or a
    /// pale red while filling.
    pub fn new(center: [f64; 2], radius: f64, progress: f64, erasing: bool, color: Rgb) -> Self {
        let complete = progress >= 1.0;
        let color = match (erasing, complete) {
            (true, true) => Rgb::ERASE,
            (true, false) => Rgb::ERASE_PENDING,
            (false, true) => Rgb::GREEN,
            (false, false) => color,
        };
        Self {
            center,
            radius,
            progress,
            start_angle: -FRAC_PI_2,
            end_angle: TAU * progress - FRAC_PI_2,
            color: color.css_hex(),
        }
    }
}

/// Filled circle shown on the frame a block is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub center: [f64; 2],
    pub radius: f64,
    pub color: String,
}

/// What the guide line tells the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuideMessage {
    /// No hand, empty structure.
    Start,
    /// No hand, structure present.
    Idle,
    /// Hand visible but the pose is ambiguous.
    Waiting,
    FirstPlacement,
    Install,
    Eraser,
    Rotate,
    Pan,
    Scale { percent: u32 },
}

impl GuideMessage {
    pub fn text(&self) -> String {
        match self {
            Self::Start => "☝️ Point your index finger to start".to_string(),
            Self::Idle => "✋ Show your hand to keep building".to_string(),
            Self::Waiting => "✋ Waiting".to_string(),
            Self::FirstPlacement => "☝️ Place the first block".to_string(),
            Self::Install => "☝️ Add a block".to_string(),
            Self::Eraser => "❌ Eraser".to_string(),
            Self::Rotate => "🔄 Rotate view".to_string(),
            Self::Pan => "🖐️ Move center".to_string(),
            Self::Scale { percent } => format!("🔍 Scale: {percent}%"),
        }
    }
}
