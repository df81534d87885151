// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orbit camera state and direct-manipulation gestures.
//!
//! Rotate and pan apply per-frame fingertip deltas (the baseline moves with
//! the finger every frame); scale is relative to the pinch captured when the
//! gesture started. Only one manipulation is engaged at a time, and
//! switching or releasing drops its baseline, so separate holds never carry
//! momentum into each other.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::geometry::Camera;

/// Which physical camera feeds the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Selfie camera; the feed is displayed mirrored.
    #[default]
    Front,
    /// Environment camera; the feed is displayed as-is.
    Rear,
}

impl CameraFacing {
    pub fn is_mirrored(&self) -> bool {
        matches!(self, Self::Front)
    }

    /// Sign applied to horizontal deltas so motion follows what the user sees.
    pub fn mirror_sign(&self) -> f64 {
        match self {
            Self::Front => 1.0,
            Self::Rear => -1.0,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Front => Self::Rear,
            Self::Rear => Self::Front,
        }
    }
}

/// Camera orbit angles, orbit center and structure scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Azimuth, radians.
    pub theta: f64,
    /// Polar angle from +y, radians. Not wrapped.
    pub phi: f64,
    /// Point the camera orbits around.
    pub target: Point3<f64>,
    /// Uniform scale of the building group.
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            theta: 0.0,
            phi: FRAC_PI_2,
            target: Point3::origin(),
            scale: 1.0,
        }
    }
}

/// Camera position and up vector derived from a [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub up: Vector3<f64>,
}

/// Places the camera on a sphere of `radius` around `target`.
///
/// The up vector flips once the polar angle passes a pole
/// (`phi mod 2π` in `(π, 2π)`), so orbiting over the top does not turn
/// the picture upside down.
pub fn camera_pose(theta: f64, phi: f64, radius: f64, target: &Point3<f64>) -> CameraPose {
    let offset = Vector3::new(
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    );

    let wrapped = phi.rem_euclid(TAU);
    let up = if wrapped > PI && wrapped < TAU {
        -Vector3::y()
    } else {
        Vector3::y()
    };

    CameraPose {
        position: *target + offset,
        up,
    }
}

impl ViewState {
    pub fn pose(&self, radius: f64) -> CameraPose {
        camera_pose(self.theta, self.phi, radius, &self.target)
    }

    /// Full perspective camera for ray casting.
    pub fn camera(&self, radius: f64, fov_degrees: f64, aspect: f64) -> Camera {
        let pose = self.pose(radius);
        Camera {
            position: pose.position,
            target: self.target,
            up: pose.up,
            fov_degrees,
            aspect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Engaged {
    Rotate { last: Point2<f64> },
    Pan { last: Point2<f64> },
    Scale { pinch: f64, scale: f64 },
}

/// Applies rotate / pan / scale gestures to a [`ViewState`].
#[derive(Debug, Clone)]
pub struct ViewController {
    rotation_speed: f64,
    pan_speed: f64,
    radius: f64,
    min_scale: f64,
    max_scale: f64,
    engaged: Option<Engaged>,
}

impl ViewController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
            pan_speed: config.pan_speed,
            radius: config.camera_radius,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            engaged: None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.is_some()
    }

    /// Drops any captured baseline.
    pub fn release(&mut self) {
        if self.engaged.take().is_some() {
            debug!("view manipulation released");
        }
    }

    /// Orbits the camera by the fingertip's movement since the last frame.
    pub fn rotate(&mut self, view: &mut ViewState, tip: Point2<f64>, mirror_sign: f64) {
        match &mut self.engaged {
            Some(Engaged::Rotate { last }) => {
                let delta = (tip - *last) * self.rotation_speed;
                view.theta += delta.x * 2.0 * mirror_sign;
                view.phi -= delta.y * 2.0;
                *last = tip;
            }
            engaged => {
                debug!("rotate engaged");
                *engaged = Some(Engaged::Rotate { last: tip });
            }
        }
    }

    /// Moves the orbit target along the camera's right and up axes.
    pub fn pan(&mut self, view: &mut ViewState, tip: Point2<f64>, mirror_sign: f64) {
        match &mut self.engaged {
            Some(Engaged::Pan { last }) => {
                let delta = tip - *last;
                *last = tip;

                let pose = view.pose(self.radius);
                let Some(direction) = (view.target - pose.position).try_normalize(1e-12) else {
                    return;
                };
                let Some(right) = direction.cross(&pose.up).try_normalize(1e-12) else {
                    return;
                };
                let up = pose.up.normalize();

                view.target += right * (delta.x * self.pan_speed * mirror_sign)
                    + up * (delta.y * self.pan_speed);
            }
            engaged => {
                debug!("pan engaged");
                *engaged = Some(Engaged::Pan { last: tip });
            }
        }
    }

    /// Resizes the structure in proportion to the pinch distance.
    pub fn scale(&mut self, view: &mut ViewState, pinch: f64) {
        match self.engaged {
            Some(Engaged::Scale {
                pinch: base_pinch,
                scale: base_scale,
            }) => {
                if base_pinch <= f64::EPSILON {
                    return;
                }
                let scale = base_scale * (pinch / base_pinch);
                view.scale = scale.clamp(self.min_scale, self.max_scale);
            }
            _ => {
                debug!(pinch, scale = view.scale, "scale engaged");
                self.engaged = Some(Engaged::Scale {
                    pinch,
                    scale: view.scale,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controller() -> ViewController {
        ViewController::new(&EngineConfig::default())
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let pose = ViewState::default().pose(40.0);
        assert_relative_eq!(pose.position, Point3::new(0.0, 0.0, 40.0), epsilon = 1e-9);
        assert_eq!(pose.up, Vector3::y());
    }

    #[test]
    fn pose_is_relative_to_target() {
        let target = Point3::new(1.0, 2.0, 3.0);
        let pose = camera_pose(FRAC_PI_2, FRAC_PI_2, 10.0, &target);
        assert_relative_eq!(pose.position, Point3::new(11.0, 2.0, 3.0), epsilon = 1e-9);
    }

    #[test]
    fn up_flips_past_the_pole() {
        let origin = Point3::origin();
        assert_eq!(camera_pose(0.0, 1.5 * PI, 40.0, &origin).up, -Vector3::y());
        assert_eq!(camera_pose(0.0, -FRAC_PI_2, 40.0, &origin).up, -Vector3::y());
        assert_eq!(camera_pose(0.0, 2.5 * PI, 40.0, &origin).up, Vector3::y());
        assert_eq!(camera_pose(0.0, 0.3, 40.0, &origin).up, Vector3::y());
    }

    #[test]
    fn first_rotate_frame_only_captures_baseline() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.rotate(&mut view, Point2::new(0.5, 0.5), 1.0);
        assert_eq!(view, ViewState::default());
        assert!(c.is_engaged());
    }

    #[test]
    fn rotate_uses_per_frame_deltas() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.rotate(&mut view, Point2::new(0.5, 0.5), 1.0);
        c.rotate(&mut view, Point2::new(0.6, 0.45), 1.0);
        assert_relative_eq!(view.theta, 0.1 * 4.0 * 2.0, epsilon = 1e-12);
        assert_relative_eq!(view.phi, FRAC_PI_2 + 0.05 * 4.0 * 2.0, epsilon = 1e-12);

        // holding still after moving changes nothing
        let before = view;
        c.rotate(&mut view, Point2::new(0.6, 0.45), 1.0);
        assert_eq!(view, before);
    }

    #[test]
    fn mirror_sign_negates_horizontal_rotation() {
        let run = |sign: f64| {
            let mut c = controller();
            let mut view = ViewState::default();
            c.rotate(&mut view, Point2::new(0.4, 0.5), sign);
            c.rotate(&mut view, Point2::new(0.47, 0.5), sign);
            view.theta
        };
        let front = run(CameraFacing::Front.mirror_sign());
        let rear = run(CameraFacing::Rear.mirror_sign());
        assert!(front != 0.0);
        assert_relative_eq!(front, -rear);
    }

    #[test]
    fn release_requires_a_fresh_baseline() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.rotate(&mut view, Point2::new(0.1, 0.1), 1.0);
        c.release();
        c.rotate(&mut view, Point2::new(0.9, 0.9), 1.0);
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn pan_moves_target_in_screen_plane() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.pan(&mut view, Point2::new(0.5, 0.5), 1.0);
        c.pan(&mut view, Point2::new(0.6, 0.5), 1.0);

        // looking down -z with +y up, so right is +x
        assert_relative_eq!(view.target, Point3::new(4.0, 0.0, 0.0), epsilon = 1e-9);

        c.pan(&mut view, Point2::new(0.6, 0.55), 1.0);
        assert_relative_eq!(view.target, Point3::new(4.0, 2.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn pan_mirror_only_flips_horizontal() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.pan(&mut view, Point2::new(0.5, 0.5), -1.0);
        c.pan(&mut view, Point2::new(0.6, 0.6), -1.0);
        assert_relative_eq!(view.target, Point3::new(-4.0, 4.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn switching_gesture_resets_baseline() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.rotate(&mut view, Point2::new(0.5, 0.5), 1.0);
        // pan entry must not reuse the rotate baseline
        c.pan(&mut view, Point2::new(0.9, 0.9), 1.0);
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn scale_follows_pinch_ratio() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.scale(&mut view, 0.1);
        c.scale(&mut view, 0.15);
        assert_relative_eq!(view.scale, 1.5, epsilon = 1e-12);
        c.scale(&mut view, 0.05);
        assert_relative_eq!(view.scale, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn scale_is_clamped() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.scale(&mut view, 0.1);
        c.scale(&mut view, 0.1 * 100.0);
        assert_relative_eq!(view.scale, 5.0);
        c.scale(&mut view, 0.1 * 0.001);
        assert_relative_eq!(view.scale, 0.2);
    }

    #[test]
    fn scale_baseline_is_the_current_scale() {
        let mut c = controller();
        let mut view = ViewState {
            scale: 2.0,
            ..Default::default()
        };
        c.scale(&mut view, 0.2);
        c.scale(&mut view, 0.3);
        assert_relative_eq!(view.scale, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_baseline_pinch_is_ignored() {
        let mut c = controller();
        let mut view = ViewState::default();
        c.scale(&mut view, 0.0);
        c.scale(&mut view, 0.2);
        assert_relative_eq!(view.scale, 1.0);
    }

    #[test]
    fn facing_toggles() {
        assert_eq!(CameraFacing::Front.toggled(), CameraFacing::Rear);
        assert!(CameraFacing::default().is_mirrored());
        assert!(!CameraFacing::Rear.is_mirrored());
    }
}
