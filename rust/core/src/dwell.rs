// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dwell confirmation.
//!
//! A per-frame target is only acted on once it has been held continuously
//! for the dwell duration. The tracker fires at most once per continuous
//! hold; the target has to change (or disappear) before it can fire again.

use serde::{Deserialize, Serialize};

use crate::blocks::BlockKey;
use crate::grid::GridCell;

/// Identity of whatever the pointer is resting on.
///
/// Install and erase targets live in different variants, so switching mode
/// always counts as a new target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    /// A grid cell a new block would occupy.
    Cell(GridCell),
    /// An existing block to delete.
    Block(BlockKey),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    target: HoverTarget,
    started_ms: f64,
    acted: bool,
}

/// Result of feeding one frame to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellStatus {
    /// Fraction of the dwell elapsed, in `[0, 1]`.
    pub progress: f64,
    /// `true` on exactly the frame the action should fire.
    pub confirmed: bool,
    /// Whether this hold has already fired.
    pub acted: bool,
}

/// IDLE / HOVER state machine.
#[derive(Debug, Clone)]
pub struct DwellTracker {
    dwell_ms: f64,
    hover: Option<Hover>,
}

impl DwellTracker {
    pub fn new(dwell_ms: f64) -> Self {
        Self {
            dwell_ms,
            hover: None,
        }
    }

    /// The target currently being held, if any.
    pub fn target(&self) -> Option<HoverTarget> {
        self.hover.map(|h| h.target)
    }

    /// Feeds this frame's target.
    pub fn update(&mut self, target: HoverTarget, now_ms: f64) -> DwellStatus {
        let hover = match &mut self.hover {
            Some(hover) if hover.target == target => hover,
            slot => {
                *slot = Some(Hover {
                    target,
                    started_ms: now_ms,
                    acted: false,
                });
                return DwellStatus {
                    progress: 0.0,
                    confirmed: false,
                    acted: false,
                };
            }
        };

        let elapsed = (now_ms - hover.started_ms).max(0.0);
        let progress = (elapsed / self.dwell_ms).min(1.0);
        let confirmed = elapsed >= self.dwell_ms && !hover.acted;
        if confirmed {
            hover.acted = true;
        }

        DwellStatus {
            progress,
            confirmed,
            acted: hover.acted,
        }
    }

    /// No target this frame: back to IDLE.
    pub fn clear(&mut self) {
        self.hover = None;
    }
}
