// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drives a [`Session`] through recorded frames.

use blockhand_core::{
    persistence::BlockRecord, BlockStore, GeometryQuery, Mode, Rgb, SceneEvent, Session, Viewport,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::recording::{Control, RecordedFrame};

/// What happened over a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub frames: usize,
    pub duration_ms: f64,
    pub placed: usize,
    pub removed: usize,
    pub cleared: usize,
    pub final_scale: f64,
    pub blocks: Vec<BlockRecord>,
}

fn apply_control<S: BlockStore, Q: GeometryQuery>(
    session: &mut Session<S, Q>,
    control: &Control,
    summary: &mut ReplaySummary,
) {
    match control {
        Control::Clear => {
            let events = session.clear_all();
            summary.cleared += events.len();
            info!("cleared");
        }
        Control::ToggleCamera => {
            let facing = session.toggle_camera();
            info!(?facing, "camera toggled");
        }
        Control::Color { value } => {
            let color = Rgb::new(*value);
            session.set_color(color);
            debug!(color = %color.css_hex(), "color selected");
        }
        Control::Eraser { enabled } => {
            session.set_eraser(*enabled);
            debug!(enabled, "eraser toggled");
        }
        Control::Viewport { width, height } => {
            session.set_viewport(Viewport::new(*width, *height));
        }
    }
}

/// Feeds every frame in order and tallies the resulting events.
pub fn run<S: BlockStore, Q: GeometryQuery>(
    session: &mut Session<S, Q>,
    frames: &[RecordedFrame],
) -> ReplaySummary {
    let mut summary = ReplaySummary {
        frames: frames.len(),
        duration_ms: 0.0,
        placed: 0,
        removed: 0,
        cleared: 0,
        final_scale: 1.0,
        blocks: Vec::new(),
    };
    let mut last_mode = Mode::Idle;

    for frame in frames {
        if let Some(control) = &frame.control {
            apply_control(session, control, &mut summary);
        }

        let output = session.process_frame(frame.hand.as_ref(), frame.t);
        if output.mode != last_mode {
            debug!(t = frame.t, mode = ?output.mode, "mode");
            last_mode = output.mode;
        }

        for event in &output.events {
            match event {
                SceneEvent::BlockAdded { cell, color, .. } => {
                    summary.placed += 1;
                    info!(t = frame.t, %cell, color = %Rgb::new(*color).css_hex(), "block added");
                }
                SceneEvent::BlockRemoved { cell, .. } => {
                    summary.removed += 1;
                    info!(t = frame.t, %cell, "block removed");
                }
                SceneEvent::Cleared => summary.cleared += 1,
            }
        }
    }

    let first = frames.first().map_or(0.0, |f| f.t);
    summary.duration_ms = frames.last().map_or(0.0, |f| f.t - first);
    summary.final_scale = session.view().scale;

    let cell_size = session.config().cell_size;
    summary.blocks = session
        .blocks()
        .iter()
        .map(|(_, block)| BlockRecord::from_block(block, cell_size))
        .collect();

    summary
}
