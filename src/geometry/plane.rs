//! Working planes: the 2D frame point entry and grid snapping happen in.

use bevy::prelude::*;

use crate::constants::DEGENERATE_LENGTH_SQ;

/// An oriented plane with an in-plane frame.
///
/// `y_dir` is always `normal × x_dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workplane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub x_dir: Vec3,
    pub y_dir: Vec3,
}

impl Workplane {
    /// Build a plane from a normal and an x direction; the x direction is made
    /// orthogonal to the normal. Returns `None` when the two are parallel.
    pub fn new(origin: Vec3, normal: Vec3, x_dir: Vec3) -> Option<Self> {
        let normal = normal.normalize_or_zero();
        let x_dir = (x_dir - normal * x_dir.dot(normal)).normalize_or_zero();
        if normal.length_squared() < DEGENERATE_LENGTH_SQ || x_dir.length_squared() < DEGENERATE_LENGTH_SQ
        {
            return None;
        }
        Some(Self {
            origin,
            normal,
            x_dir,
            y_dir: normal.cross(x_dir),
        })
    }

    /// World XY plane (Z up).
    pub fn xy() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Z,
            x_dir: Vec3::X,
            y_dir: Vec3::Y,
        }
    }

    /// Ground plane of a Y-up scene; local y runs towards -Z.
    pub fn ground() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Y,
            x_dir: Vec3::X,
            y_dir: Vec3::NEG_Z,
        }
    }

    pub fn translate_to(&self, origin: Vec3) -> Self {
        Self { origin, ..*self }
    }

    pub fn intersect_ray(&self, ray: &Ray3d) -> Option<Vec3> {
        let denom = self.normal.dot(*ray.direction);
        if denom.abs() < 1.0e-6 {
            return None;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.get_point(t))
    }

    /// Coordinates of `point` in the plane frame (x, y, height above plane).
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let d = point - self.origin;
        Vec3::new(d.dot(self.x_dir), d.dot(self.y_dir), d.dot(self.normal))
    }

    pub fn from_local(&self, local: Vec3) -> Vec3 {
        self.origin + self.x_dir * local.x + self.y_dir * local.y + self.normal * local.z
    }
}

impl Default for Workplane {
    fn default() -> Self {
        Self::xy()
    }
}
