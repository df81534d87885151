// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blockhand Replay - headless playback of recorded hand-tracking sessions.
//!
//! Feeds a JSON-lines landmark recording through the engine exactly as the
//! browser would, logging every placement and removal. Useful for reproducing
//! interaction bugs without a camera.
//!
//! Engine settings come from `BLOCKHAND_*` environment variables; log
//! verbosity from `RUST_LOG`.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context};
use blockhand_core::{persistence::BlockStore, CameraFacing, MemoryStore, Session};

mod config;
mod recording;
mod replay;
mod store;

use store::FileStore;

/// Command-line options.
#[derive(Debug, Default)]
struct Args {
    recording: PathBuf,
    store: Option<PathBuf>,
    rear: bool,
    summary: bool,
}

impl Args {
    /// `None` when help was requested.
    fn parse(args: &[String]) -> anyhow::Result<Option<Self>> {
        let Some(first) = args.first() else {
            return Ok(None);
        };
        if first == "--help" || first == "-h" {
            return Ok(None);
        }

        let mut parsed = Args {
            recording: PathBuf::from(first),
            ..Args::default()
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--store" => {
                    i += 1;
                    let dir = args.get(i).context("--store needs a directory")?;
                    parsed.store = Some(PathBuf::from(dir));
                }
                "--rear" => parsed.rear = true,
                "--summary" => parsed.summary = true,
                "--help" | "-h" => return Ok(None),
                other => bail!("unknown option: {other}"),
            }
            i += 1;
        }

        Ok(Some(parsed))
    }
}

fn run<S: BlockStore>(args: &Args, store: S) -> anyhow::Result<()> {
    let config = config::from_env();
    tracing::info!(
        cell_size = config.cell_size,
        dwell_ms = config.dwell_ms,
        slot = %config.storage_key,
        "starting replay"
    );

    let file = File::open(&args.recording)
        .with_context(|| format!("opening {}", args.recording.display()))?;
    let frames = recording::read_frames(BufReader::new(file))
        .with_context(|| format!("reading {}", args.recording.display()))?;

    let mut session = Session::new(config, store).context("invalid engine configuration")?;
    if args.rear {
        session.set_facing(CameraFacing::Rear);
    }
    tracing::info!(restored = session.blocks().len(), frames = frames.len(), "recording loaded");

    let summary = replay::run(&mut session, &frames);
    tracing::info!(
        placed = summary.placed,
        removed = summary.removed,
        blocks = summary.blocks.len(),
        duration_ms = summary.duration_ms,
        "replay finished"
    );

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // stdout carries the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,blockhand_core=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let Some(args) = Args::parse(&raw)? else {
        print_usage();
        return Ok(());
    };

    match &args.store {
        Some(dir) => run(&args, FileStore::new(dir)),
        None => run(&args, MemoryStore::new()),
    }
}

fn print_usage() {
    eprintln!(
        r#"
Blockhand Replay
================

Plays a recorded hand-landmark session through the block building engine.

USAGE:
  blockhand-replay <recording.jsonl> [OPTIONS]

ARGUMENTS:
  <recording.jsonl>         One JSON frame per line:
                            {{"t": ms, "hand": [[x, y] x21] | null, "control": {{...}}}}

OPTIONS:
  --store <dir>             Load and save blocks in <dir>/<slot>.json
                            (default: in memory only)
  --rear                    Treat the recording as coming from the rear camera
  --summary                 Print a JSON summary to stdout
  -h, --help                Show this help message

CONTROLS:
  {{"type": "clear"}}
  {{"type": "toggle_camera"}}
  {{"type": "color", "value": 16724787}}
  {{"type": "eraser", "enabled": true}}
  {{"type": "viewport", "width": 1280, "height": 720}}

ENVIRONMENT:
  BLOCKHAND_CELL_SIZE, BLOCKHAND_DWELL_MS, BLOCKHAND_ROTATION_SPEED,
  BLOCKHAND_PAN_SPEED, BLOCKHAND_CAMERA_RADIUS, BLOCKHAND_FOV,
  BLOCKHAND_MIN_SCALE, BLOCKHAND_MAX_SCALE, BLOCKHAND_SMOOTHING,
  BLOCKHAND_BACK_WALL_Z, BLOCKHAND_STORAGE_KEY, BLOCKHAND_COLOR
  RUST_LOG                  Log filter (default: info,blockhand_core=debug)
"#
    );
}
