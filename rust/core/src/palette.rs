// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block colors and the swatch set offered by the UI.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const RED: Rgb = Rgb(0xFF3333);
    pub const GREEN: Rgb = Rgb(0x00FF00);
    pub const ERASE: Rgb = Rgb(0xFF0000);
    pub const ERASE_PENDING: Rgb = Rgb(0xFFAAAA);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);

    /// Builds a color, discarding anything above the low 24 bits.
    pub const fn new(value: u32) -> Self {
        Self(value & 0xFF_FFFF)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// `#rrggbb`, as accepted by canvas and CSS.
    pub fn css_hex(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::RED
    }
}

impl From<u32> for Rgb {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Colors offered by the swatch bar, in display order.
pub const SWATCHES: [Rgb; 8] = [
    Rgb(0xFF3333),
    Rgb(0xFF9933),
    Rgb(0xFFDD33),
    Rgb(0x33CC66),
    Rgb(0x3399FF),
    Rgb(0x9966FF),
    Rgb(0x8B5A2B),
    Rgb(0xFFFFFF),
];
