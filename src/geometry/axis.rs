//! Named tracking axes and the line math that goes with them.

use bevy::prelude::*;

use crate::constants::{DEGENERATE_LENGTH_SQ, INTERSECTION_TOLERANCE};

use super::plane::Workplane;

/// A half-infinite line the pointer can be tracked along.
///
/// `direction` is unit length unless the axis was built from a degenerate vector,
/// in which case it is zero and [`Axis::is_degenerate`] returns true.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub origin: Vec3,
    pub direction: Vec3,
    pub name: String,
}

impl Axis {
    pub fn new(origin: Vec3, direction: Vec3, name: impl Into<String>) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            name: name.into(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction.length_squared() < DEGENERATE_LENGTH_SQ
    }

    /// Signed parameter of `point` projected onto this axis.
    pub fn parameter_of(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point on the (infinite) axis line closest to the given ray's line.
    ///
    /// For parallel lines the ray origin is projected onto the axis.
    pub fn nearest_to_ray(&self, ray: &Ray3d) -> Vec3 {
        match closest_parameters(self.origin, self.direction, ray.origin, *ray.direction) {
            Some((s, _)) => self.point_at(s),
            None => self.point_at(self.parameter_of(ray.origin)),
        }
    }

    /// Intersection of two axes, if their lines meet in front of both origins.
    ///
    /// Returns the midpoint of the two closest points so the result does not
    /// depend on which axis is `self`.
    pub fn intersect(&self, other: &Axis) -> Option<Vec3> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }
        let (s, t) = closest_parameters(self.origin, self.direction, other.origin, other.direction)?;
        let p = self.point_at(s);
        let q = other.point_at(t);
        let tolerance = INTERSECTION_TOLERANCE * (1.0 + p.abs().max_element().max(q.abs().max_element()));
        if p.distance(q) > tolerance || s < -tolerance || t < -tolerance {
            return None;
        }
        Some((p + q) * 0.5)
    }
}

/// Parameters `(s, t)` of the mutually closest points on lines `p + s*u` and `q + t*v`.
///
/// Returns `None` when the lines are parallel or either direction is degenerate.
pub fn closest_parameters(p: Vec3, u: Vec3, q: Vec3, v: Vec3) -> Option<(f32, f32)> {
    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    if a < DEGENERATE_LENGTH_SQ || c < DEGENERATE_LENGTH_SQ {
        return None;
    }
    let w = p - q;
    let d = u.dot(w);
    let e = v.dot(w);
    let denom = a * c - b * b;
    // Relative test: sin^2 of the angle between the lines
    if denom <= 1.0e-10 * a * c {
        return None;
    }
    let s = (b * e - c * d) / denom;
    let t = (a * e - b * d) / denom;
    Some((s, t))
}

pub const NORMAL_AXIS_LABEL: &str = "Normal";

/// The in-plane axes through the plane origin: +X, -X, +Y, -Y and optionally ±normal.
pub fn axes_at_plane(plane: &Workplane, with_normal: bool) -> Vec<Axis> {
    let origin = plane.origin;
    let mut axes = vec![
        Axis::new(origin, plane.x_dir, "X axis"),
        Axis::new(origin, -plane.x_dir, "X axis"),
        Axis::new(origin, plane.y_dir, "Y axis"),
        Axis::new(origin, -plane.y_dir, "Y axis"),
    ];
    if with_normal {
        axes.extend(normal_axes(plane));
    }
    axes
}

/// Both directions of the plane normal, whatever world axis it points along.
fn normal_axes(plane: &Workplane) -> [Axis; 2] {
    [
        Axis::new(plane.origin, plane.normal, NORMAL_AXIS_LABEL),
        Axis::new(plane.origin, -plane.normal, NORMAL_AXIS_LABEL),
    ]
}

/// Polar tracking: one axis every `angle_deg` degrees around the plane normal.
pub fn polar_axes_at_plane(plane: &Workplane, angle_deg: f32, with_normal: bool) -> Vec<Axis> {
    if !(angle_deg > 0.0 && angle_deg < 360.0) {
        return axes_at_plane(plane, with_normal);
    }
    let count = (360.0 / angle_deg).floor() as usize;
    let mut axes = Vec::with_capacity(count + 2);
    for i in 0..count {
        let degrees = angle_deg * i as f32;
        let rotation = Quat::from_axis_angle(plane.normal, degrees.to_radians());
        axes.push(Axis::new(
            plane.origin,
            rotation * plane.x_dir,
            format!("{degrees:.0}°"),
        ));
    }
    if with_normal {
        axes.extend(normal_axes(plane));
    }
    axes
}
