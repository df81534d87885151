// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-frame driver.
//!
//! A [`Session`] owns every piece of engine state: blocks, view, gesture
//! baselines, hover and pointer smoothing. The front end calls
//! [`Session::process_frame`] once per tracked video frame and applies the
//! returned [`FrameOutput`] to its scene and overlay canvas.

use nalgebra::Point3;
use serde::Serialize;
use tracing::{debug, trace};

use crate::blocks::BlockCollection;
use crate::config::EngineConfig;
use crate::dwell::{DwellStatus, DwellTracker, HoverTarget};
use crate::error::Result;
use crate::geometry::{Camera, GeometryQuery, Raycaster};
use crate::gesture::{Gesture, GestureClassifier};
use crate::grid::GridCell;
use crate::landmarks::HandLandmarks;
use crate::overlay::{DwellRing, Flash, GuideMessage, Skeleton, Viewport};
use crate::palette::Rgb;
use crate::persistence::{self, BlockStore};
use crate::placement::{InstallOutcome, PlacementEngine};
use crate::pointer::{self, PointerSmoother};
use crate::view::{CameraFacing, ViewController, ViewState};

/// Preview opacity while the dwell is running.
const PREVIEW_OPACITY: f64 = 0.5;
/// Preview opacity once the hold has acted.
const PREVIEW_OPACITY_ACTED: f64 = 0.9;
/// Delete highlight size relative to a block.
const DELETE_HIGHLIGHT_SCALE: f64 = 1.05;

/// User-facing toggles read every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Controls {
    pub color: Rgb,
    pub eraser: bool,
    pub facing: CameraFacing,
}

/// What the engine did with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// No hand, or nothing to do yet.
    #[default]
    Idle,
    /// Ambiguous pose.
    Waiting,
    FirstPlacement,
    Install,
    Erase,
    Rotate,
    Pan,
    Scale,
}

/// Scene mutation the renderer must mirror.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SceneEvent {
    #[serde(rename_all = "camelCase")]
    BlockAdded {
        cell: GridCell,
        /// Group-local center.
        position: [f64; 3],
        color: u32,
    },
    #[serde(rename_all = "camelCase")]
    BlockRemoved { cell: GridCell, position: [f64; 3] },
    Cleared,
}

/// Translucent block showing where an install would land.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub cell: GridCell,
    pub position: [f64; 3],
    pub color: String,
    pub opacity: f64,
}

/// Wireframe box around the block an erase would remove.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteHighlight {
    pub cell: GridCell,
    pub position: [f64; 3],
    pub size: f64,
}

/// Camera placement for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraOutput {
    pub position: [f64; 3],
    pub up: [f64; 3],
    pub target: [f64; 3],
}

/// Everything the front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub gesture: Option<Gesture>,
    pub mode: Mode,
    pub guide: GuideMessage,
    pub guide_text: String,
    pub skeleton: Option<Skeleton>,
    pub ring: Option<DwellRing>,
    pub flash: Option<Flash>,
    /// World-space ray hit.
    pub cursor: Option<[f64; 3]>,
    pub preview: Option<Preview>,
    pub delete_highlight: Option<DeleteHighlight>,
    pub events: Vec<SceneEvent>,
    pub camera: CameraOutput,
    pub scale: f64,
    pub block_count: usize,
}

/// Engine state for one building session.
pub struct Session<S, Q = Raycaster> {
    config: EngineConfig,
    classifier: GestureClassifier,
    dwell: DwellTracker,
    placement: PlacementEngine,
    view_controller: ViewController,
    view: ViewState,
    smoother: PointerSmoother,
    blocks: BlockCollection,
    store: S,
    query: Q,
    controls: Controls,
    viewport: Viewport,
    last_mode: Mode,
}

impl<S: BlockStore> Session<S> {
    /// Creates a session using the analytic ray caster, restoring any blocks
    /// found in `store`.
    pub fn new(config: EngineConfig, store: S) -> Result<Self> {
        Self::with_query(config, store, Raycaster)
    }
}

impl<S: BlockStore, Q: GeometryQuery> Session<S, Q> {
    /// Creates a session with a custom geometry provider.
    pub fn with_query(config: EngineConfig, store: S, query: Q) -> Result<Self> {
        config.validate()?;
        let blocks = persistence::load_blocks(&store, &config.storage_key, config.cell_size);
        debug!(blocks = blocks.len(), "session started");

        Ok(Self {
            classifier: GestureClassifier::new(config.classifier.clone()),
            dwell: DwellTracker::new(config.dwell_ms),
            placement: PlacementEngine::new(&config),
            view_controller: ViewController::new(&config),
            view: ViewState::default(),
            smoother: PointerSmoother::new(config.smoothing),
            blocks,
            store,
            query,
            controls: Controls {
                color: Rgb::new(config.default_color),
                eraser: false,
                facing: CameraFacing::default(),
            },
            viewport: Viewport::default(),
            last_mode: Mode::Idle,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn blocks(&self) -> &BlockCollection {
        &self.blocks
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.controls.color = color;
    }

    /// Switching between install and erase abandons the current hover.
    pub fn set_eraser(&mut self, eraser: bool) {
        if self.controls.eraser != eraser {
            self.controls.eraser = eraser;
            self.dwell.clear();
        }
    }

    /// Switches the video source. Any change resets transient state, since
    /// the pointer mapping flips.
    pub fn set_facing(&mut self, facing: CameraFacing) {
        if self.controls.facing != facing {
            self.controls.facing = facing;
            self.reset_transient();
            debug!(?facing, "camera switched");
        }
    }

    pub fn toggle_camera(&mut self) -> CameraFacing {
        self.set_facing(self.controls.facing.toggled());
        self.controls.facing
    }

    /// Removes every block, erases the stored copy and resets the view.
    pub fn clear_all(&mut self) -> Vec<SceneEvent> {
        let removed = self.blocks.clear();
        persistence::clear_blocks(&mut self.store, &self.config.storage_key);
        self.reset_transient();
        debug!(removed = removed.len(), "cleared all blocks");
        vec![SceneEvent::Cleared]
    }

    /// Drops gesture baselines, hover, pointer smoothing and view changes.
    pub fn reset_transient(&mut self) {
        self.view_controller.release();
        self.dwell.clear();
        self.smoother.reset();
        self.view = ViewState::default();
        self.last_mode = Mode::Idle;
    }

    /// Render camera for the current view.
    pub fn camera(&self) -> Camera {
        self.view.camera(
            self.config.camera_radius,
            self.config.fov_degrees,
            self.viewport.aspect(),
        )
    }

    /// Runs one frame. `hand` is the first detected hand, if any;
    /// `now_ms` is a monotonic timestamp.
    pub fn process_frame(&mut self, hand: Option<&HandLandmarks>, now_ms: f64) -> FrameOutput {
        let mut frame = FrameState::default();

        match hand {
            None => {
                self.view_controller.release();
                self.dwell.clear();
                frame.mode = Mode::Idle;
            }
            Some(hand) => {
                frame.skeleton = Some(Skeleton::new(hand, &self.viewport));
                let gesture = self.classifier.classify(hand, self.controls.eraser);
                trace!(%gesture, "classified");
                frame.gesture = Some(gesture);
                frame.mode = self.resolve_mode(gesture);

                match frame.mode {
                    Mode::Rotate | Mode::Pan | Mode::Scale => {
                        self.dwell.clear();
                        self.manipulate(frame.mode, hand);
                    }
                    Mode::FirstPlacement | Mode::Install | Mode::Erase => {
                        self.view_controller.release();
                        self.discrete(frame.mode, hand, now_ms, &mut frame);
                    }
                    Mode::Idle | Mode::Waiting => {
                        self.view_controller.release();
                        self.dwell.clear();
                    }
                }
            }
        }

        if frame.mode != self.last_mode {
            debug!(from = ?self.last_mode, to = ?frame.mode, "mode changed");
            self.last_mode = frame.mode;
        }

        self.output(frame)
    }

    /// Applies the empty-structure rules on top of the classifier.
    ///
    /// With no blocks there is nothing to orbit, resize or erase; pointing
    /// (including the "L" pose) places the first block.
    fn resolve_mode(&self, gesture: Gesture) -> Mode {
        let has_blocks = !self.blocks.is_empty();
        match (gesture, has_blocks) {
            (Gesture::Pan, true) => Mode::Pan,
            (Gesture::Rotate, true) => Mode::Rotate,
            (Gesture::Scale, true) => Mode::Scale,
            (Gesture::Install, true) => Mode::Install,
            (Gesture::Eraser, true) => Mode::Erase,
            (Gesture::None, true) => Mode::Waiting,
            (Gesture::Install | Gesture::Scale, false) => Mode::FirstPlacement,
            (_, false) => Mode::Idle,
        }
    }

    fn manipulate(&mut self, mode: Mode, hand: &HandLandmarks) {
        let sign = self.controls.facing.mirror_sign();
        match mode {
            Mode::Rotate => self.view_controller.rotate(&mut self.view, hand.index_tip(), sign),
            Mode::Pan => self.view_controller.pan(&mut self.view, hand.index_tip(), sign),
            Mode::Scale => self.view_controller.scale(&mut self.view, hand.pinch_distance()),
            _ => {}
        }
    }

    fn discrete(&mut self, mode: Mode, hand: &HandLandmarks, now_ms: f64, frame: &mut FrameState) {
        let tip = hand.index_tip();
        let ndc = self.smoother.update(pointer::to_ndc(&tip, self.controls.facing));
        let camera = self.camera();
        let Some(ray) = self.query.pointer_ray(&camera, &ndc) else {
            self.dwell.clear();
            return;
        };

        let tip_px = self.viewport.to_pixels(&tip);
        let scale = self.view.scale;
        let cell_size = self.config.cell_size;

        if mode == Mode::Erase {
            let Some(target) = self.placement.erase_target(&self.query, &ray, &self.blocks, scale)
            else {
                self.dwell.clear();
                return;
            };

            let status = self.dwell.update(HoverTarget::Block(target.key), now_ms);
            frame.cursor = Some(array(&target.hit_point));
            frame.ring = Some(self.ring(tip_px, &status, true));

            if status.confirmed {
                if let Some(block) = self.placement.erase(&mut self.blocks, target.key) {
                    self.persist();
                    frame.events.push(SceneEvent::BlockRemoved {
                        cell: block.cell,
                        position: array(&block.cell.center(cell_size)),
                    });
                }
            } else {
                frame.delete_highlight = Some(DeleteHighlight {
                    cell: target.cell,
                    position: array(&target.cell.center(cell_size)),
                    size: cell_size * DELETE_HIGHLIGHT_SCALE,
                });
            }
            return;
        }

        let Some(target) = self
            .placement
            .install_target(&self.query, &ray, &self.blocks, scale)
        else {
            self.dwell.clear();
            return;
        };

        let status = self.dwell.update(HoverTarget::Cell(target.cell), now_ms);
        frame.cursor = Some(array(&target.hit_point));
        frame.ring = Some(self.ring(tip_px, &status, false));

        if status.confirmed {
            let color = self.controls.color;
            if let InstallOutcome::Placed(_) =
                self.placement.install(&mut self.blocks, target.cell, color)
            {
                self.persist();
                frame.events.push(SceneEvent::BlockAdded {
                    cell: target.cell,
                    position: array(&target.cell.center(cell_size)),
                    color: color.value(),
                });
                frame.flash = Some(Flash {
                    center: tip_px,
                    radius: self.config.ring_radius_px,
                    color: color.css_hex(),
                });
            }
        }

        frame.preview = Some(Preview {
            cell: target.cell,
            position: array(&target.cell.center(cell_size)),
            color: self.controls.color.css_hex(),
            opacity: if status.acted {
                PREVIEW_OPACITY_ACTED
            } else {
                PREVIEW_OPACITY
            },
        });
    }

    fn ring(&self, center: [f64; 2], status: &DwellStatus, erasing: bool) -> DwellRing {
        DwellRing::new(
            center,
            self.config.ring_radius_px,
            status.progress,
            erasing,
            self.controls.color,
        )
    }

    fn persist(&mut self) {
        persistence::save_blocks(
            &mut self.store,
            &self.config.storage_key,
            &self.blocks,
            self.config.cell_size,
        );
    }

    fn guide(&self, mode: Mode) -> GuideMessage {
        match mode {
            Mode::Idle if self.blocks.is_empty() => GuideMessage::Start,
            Mode::Idle => GuideMessage::Idle,
            Mode::Waiting => GuideMessage::Waiting,
            Mode::FirstPlacement => GuideMessage::FirstPlacement,
            Mode::Install => GuideMessage::Install,
            Mode::Erase => GuideMessage::Eraser,
            Mode::Rotate => GuideMessage::Rotate,
            Mode::Pan => GuideMessage::Pan,
            Mode::Scale => GuideMessage::Scale {
                percent: (self.view.scale * 100.0).round() as u32,
            },
        }
    }

    fn output(&self, frame: FrameState) -> FrameOutput {
        let pose = self.view.pose(self.config.camera_radius);
        let guide = self.guide(frame.mode);
        FrameOutput {
            gesture: frame.gesture,
            mode: frame.mode,
            guide_text: guide.text(),
            guide,
            skeleton: frame.skeleton,
            ring: frame.ring,
            flash: frame.flash,
            cursor: frame.cursor,
            preview: frame.preview,
            delete_highlight: frame.delete_highlight,
            events: frame.events,
            camera: CameraOutput {
                position: array(&pose.position),
                up: [pose.up.x, pose.up.y, pose.up.z],
                target: array(&self.view.target),
            },
            scale: self.view.scale,
            block_count: self.blocks.len(),
        }
    }
}

/// Per-frame scratch collected while processing.
#[derive(Default)]
struct FrameState {
    gesture: Option<Gesture>,
    mode: Mode,
    skeleton: Option<Skeleton>,
    ring: Option<DwellRing>,
    flash: Option<Flash>,
    cursor: Option<[f64; 3]>,
    preview: Option<Preview>,
    delete_highlight: Option<DeleteHighlight>,
    events: Vec<SceneEvent>,
}

#[inline]
fn array(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}
