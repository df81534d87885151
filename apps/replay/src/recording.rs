// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recorded sessions: one JSON object per line.
//!
//! ```text
//! {"t": 0, "hand": [[0.5, 0.8], ...]}
//! {"t": 16, "hand": null, "control": {"type": "eraser", "enabled": true}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use blockhand_core::HandLandmarks;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: timestamp {t} ms is earlier than the previous frame")]
    TimeTravel { line: usize, t: f64 },
}

/// A UI action taken before the frame is processed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Clear,
    ToggleCamera,
    Color { value: u32 },
    Eraser { enabled: bool },
    Viewport { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the recording started.
    pub t: f64,
    #[serde(default)]
    pub hand: Option<HandLandmarks>,
    #[serde(default)]
    pub control: Option<Control>,
}

/// Reads every frame, checking that time never runs backwards.
pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<RecordedFrame>, RecordingError> {
    let mut frames: Vec<RecordedFrame> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let frame: RecordedFrame = serde_json::from_str(trimmed).map_err(|source| {
            RecordingError::Parse {
                line: line_no,
                source,
            }
        })?;

        if let Some(last) = frames.last() {
            if frame.t < last.t {
                return Err(RecordingError::TimeTravel {
                    line: line_no,
                    t: frame.t,
                });
            }
        }
        frames.push(frame);
    }

    Ok(frames)
}
