// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

use blockhand_core::EngineConfig;

/// Builds an [`EngineConfig`] from `BLOCKHAND_*` variables. Unset or
/// unparsable values keep their defaults.
pub fn from_env() -> EngineConfig {
    from_lookup(|key| std::env::var(key).ok())
}

pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineConfig {
    let defaults = EngineConfig::default();
    let number = |key: &str, default: f64| -> f64 {
        lookup(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    };

    let cell_size = number("BLOCKHAND_CELL_SIZE", defaults.cell_size);
    EngineConfig {
        cell_size,
        dwell_ms: number("BLOCKHAND_DWELL_MS", defaults.dwell_ms),
        rotation_speed: number("BLOCKHAND_ROTATION_SPEED", defaults.rotation_speed),
        pan_speed: number("BLOCKHAND_PAN_SPEED", defaults.pan_speed),
        camera_radius: number("BLOCKHAND_CAMERA_RADIUS", defaults.camera_radius),
        fov_degrees: number("BLOCKHAND_FOV", defaults.fov_degrees),
        min_scale: number("BLOCKHAND_MIN_SCALE", defaults.min_scale),
        max_scale: number("BLOCKHAND_MAX_SCALE", defaults.max_scale),
        smoothing: number("BLOCKHAND_SMOOTHING", defaults.smoothing),
        // keep the wall half a cell behind the origin
        back_wall_z: number("BLOCKHAND_BACK_WALL_Z", -cell_size / 2.0),
        storage_key: lookup("BLOCKHAND_STORAGE_KEY")
            .unwrap_or_else(|| defaults.storage_key.clone()),
        default_color: lookup("BLOCKHAND_COLOR")
            .and_then(|v| parse_color(&v))
            .unwrap_or(defaults.default_color),
        ..defaults
    }
}

/// Accepts `#rrggbb`, `0xrrggbb` or a decimal integer.
pub fn parse_color(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Some(hex) = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    }
}
