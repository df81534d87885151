// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Blockhand Core
//!
//! Hand-gesture block building engine. Feed it 21 hand landmarks per video
//! frame and it classifies the pose, drives an orbiting camera, and places or
//! erases unit cubes on an integer grid with a dwell-to-confirm interaction.
//!
//! ## Overview
//!
//! - **Gesture classification**: scale-invariant pose rules over landmark
//!   distances ([`GestureClassifier`])
//! - **View manipulation**: spherical orbit, pan and pinch scale with
//!   per-gesture baselines ([`ViewController`])
//! - **Placement**: face-aware stacking, back-wall attachment and a
//!   fallback plane ([`PlacementEngine`])
//! - **Dwell confirmation**: one action per continuous hold ([`DwellTracker`])
//! - **Persistence**: JSON block records in a named slot ([`BlockStore`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blockhand_core::{EngineConfig, HandLandmarks, MemoryStore, Session};
//!
//! let mut session = Session::new(EngineConfig::default(), MemoryStore::new())?;
//! let hand = HandLandmarks::from_flat(&landmarks)?;
//! let frame = session.process_frame(Some(&hand), now_ms);
//! for event in &frame.events {
//!     // mirror the change into the scene graph
//! }
//! ```
//!
//! All positions handed to the renderer are in the structure group's local
//! frame; the group is scaled uniformly by [`FrameOutput::scale`].

pub mod blocks;
pub mod config;
pub mod dwell;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod grid;
pub mod landmarks;
pub mod overlay;
pub mod palette;
pub mod persistence;
pub mod placement;
pub mod pointer;
pub mod session;
pub mod view;

pub use blocks::{Block, BlockCollection, BlockKey};
pub use config::{ClassifierConfig, EngineConfig};
pub use dwell::{DwellStatus, DwellTracker, HoverTarget};
pub use error::{Error, Result};
pub use geometry::{Camera, GeometryQuery, Plane, Ray, Raycaster};
pub use gesture::{Gesture, GestureClassifier, HandMetrics};
pub use grid::GridCell;
pub use landmarks::{HandLandmarks, LANDMARK_COUNT};
pub use overlay::{DwellRing, Flash, GuideMessage, Skeleton, Viewport};
pub use palette::{Rgb, SWATCHES};
pub use persistence::{BlockRecord, BlockStore, MemoryStore};
pub use placement::{InstallOutcome, PlacementEngine, PlacementKind};
pub use pointer::PointerSmoother;
pub use session::{Controls, FrameOutput, Mode, SceneEvent, Session};
pub use view::{camera_pose, CameraFacing, CameraPose, ViewController, ViewState};
