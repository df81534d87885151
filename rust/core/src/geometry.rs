// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World queries: pointer rays and their intersections.
//!
//! The engine only talks to the scene through [`GeometryQuery`]. The
//! analytic [`Raycaster`] answers those queries from the block collection
//! itself; blocks are axis-aligned cubes inside a building group that is
//! uniformly scaled about the world origin.

use nalgebra::{Point3, Vector2, Vector3};

use crate::blocks::{BlockCollection, BlockKey};

const PARALLEL_EPSILON: f64 = 1e-12;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a ray, normalizing `direction`. Returns `None` for a zero
    /// direction.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        let direction = direction.try_normalize(PARALLEL_EPSILON)?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// An infinite plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub constant: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, constant: f64) -> Self {
        Self { normal, constant }
    }

    /// Plane through `point` with the given normal.
    pub fn from_normal_and_point(normal: Vector3<f64>, point: &Point3<f64>) -> Self {
        Self {
            normal,
            constant: -normal.dot(&point.coords),
        }
    }

    /// The plane `z = depth`, facing +z.
    pub fn facing_z(depth: f64) -> Self {
        Self::new(Vector3::z(), -depth)
    }

    pub fn distance_to_point(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) + self.constant
    }
}

/// Hit on a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    pub point: Point3<f64>,
    pub distance: f64,
}

/// Hit on a block face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub key: BlockKey,
    /// World-space hit point.
    pub point: Point3<f64>,
    /// Outward face normal in the group's local frame.
    pub normal: Vector3<f64>,
    pub distance: f64,
}

/// Perspective camera looking at a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view, in degrees.
    pub fov_degrees: f64,
    /// Viewport width / height.
    pub aspect: f64,
}

impl Camera {
    /// Orthonormal `(right, up, back)` basis of the view, built the way a
    /// `lookAt` does. If `up` is parallel to the view direction the back
    /// axis is nudged so the basis stays defined.
    pub fn basis(&self) -> Option<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
        let mut back = (self.position - self.target).try_normalize(PARALLEL_EPSILON)?;
        let mut right = self.up.cross(&back);
        if right.norm_squared() < PARALLEL_EPSILON {
            if self.up.z.abs() == 1.0 {
                back.x += 1e-4;
            } else {
                back.z += 1e-4;
            }
            back = back.normalize();
            right = self.up.cross(&back);
        }
        let right = right.try_normalize(PARALLEL_EPSILON)?;
        let up = back.cross(&right);
        Some((right, up, back))
    }

    /// Ray from the camera through a point in normalized device coordinates
    /// (`[-1, 1]` on both axes, +y up).
    pub fn ray_through(&self, ndc: &Vector2<f64>) -> Option<Ray> {
        let (right, up, back) = self.basis()?;
        let half_height = (self.fov_degrees.to_radians() / 2.0).tan();
        let half_width = half_height * self.aspect;
        let direction = -back + right * (ndc.x * half_width) + up * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }
}

/// The world queries the placement engine needs.
pub trait GeometryQuery {
    /// Ray from the camera through a pointer in device coordinates.
    fn pointer_ray(&self, camera: &Camera, ndc: &Vector2<f64>) -> Option<Ray> {
        camera.ray_through(ndc)
    }

    /// Intersection in front of the ray origin, if any.
    fn intersect_plane(&self, ray: &Ray, plane: &Plane) -> Option<PlaneHit>;

    /// Nearest block face hit. Blocks are cubes of `cell_size` in a group
    /// scaled by `scale`.
    fn intersect_blocks(
        &self,
        ray: &Ray,
        blocks: &BlockCollection,
        cell_size: f64,
        scale: f64,
    ) -> Option<BlockHit>;

    /// Converts a world point into the building group's local frame.
    fn world_to_local(&self, point: &Point3<f64>, scale: f64) -> Point3<f64> {
        Point3::from(point.coords / scale)
    }
}

/// Analytic implementation of [`GeometryQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster;

impl GeometryQuery for Raycaster {
    fn intersect_plane(&self, ray: &Ray, plane: &Plane) -> Option<PlaneHit> {
        let denom = plane.normal.dot(&ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            // parallel: only a hit if the ray lies in the plane
            return (plane.distance_to_point(&ray.origin).abs() < PARALLEL_EPSILON).then(|| {
                PlaneHit {
                    point: ray.origin,
                    distance: 0.0,
                }
            });
        }
        let t = -plane.distance_to_point(&ray.origin) / denom;
        (t >= 0.0).then(|| PlaneHit {
            point: ray.at(t),
            distance: t,
        })
    }

    fn intersect_blocks(
        &self,
        ray: &Ray,
        blocks: &BlockCollection,
        cell_size: f64,
        scale: f64,
    ) -> Option<BlockHit> {
        let half = cell_size * scale / 2.0;
        blocks
            .iter()
            .filter_map(|(key, block)| {
                let center = block.cell.center(cell_size) * scale;
                let half_extent = Vector3::repeat(half);
                ray_box(ray, &(center - half_extent), &(center + half_extent)).map(
                    |(distance, normal)| BlockHit {
                        key,
                        point: ray.at(distance),
                        normal,
                        distance,
                    },
                )
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Slab test against an axis-aligned box. Returns the entry distance and the
/// outward normal of the entered face. Boxes containing the ray origin are
/// not hit (their faces point away from the viewer).
fn ray_box(ray: &Ray, min: &Point3<f64>, max: &Point3<f64>) -> Option<(f64, Vector3<f64>)> {
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut enter_axis = 0;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < PARALLEL_EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || !t_enter.is_finite() {
        return None;
    }

    let mut normal = Vector3::zeros();
    normal[enter_axis] = -ray.direction[enter_axis].signum();
    Some((t_enter, normal))
}
