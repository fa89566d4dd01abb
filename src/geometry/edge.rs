//! Edge curves as seen by the snapping engine.
//!
//! The shape kernel owns the real curve representations; the engine only needs
//! a handful of queries on them. [`LineSegment`] is the straight-edge
//! implementation used by the viewport scene.

use std::fmt::Debug;

use bevy::prelude::*;

use crate::constants::INTERSECTION_TOLERANCE;

use super::axis::{closest_parameters, Axis};

/// Queries the engine runs against a detected edge.
pub trait EdgeCurve: Debug + Send + Sync {
    fn start(&self) -> Vec3;
    fn end(&self) -> Vec3;
    fn midpoint(&self) -> Vec3;
    /// Point on the edge closest to the pointer ray.
    fn nearest_to_ray(&self, ray: &Ray3d) -> Vec3;
    /// Perpendicular feet of `point` on the edge (empty if none lands on it).
    fn project(&self, point: Vec3) -> Vec<Vec3>;
    /// Points where the edge crosses the axis, in front of the axis origin.
    fn intersect_axis(&self, axis: &Axis) -> Vec<Vec3>;
    /// Points used to draw the edge.
    fn polyline(&self) -> Vec<Vec3>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl LineSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    fn clamp_parameter(&self, point: Vec3) -> f32 {
        let v = self.vector();
        let len_sq = v.length_squared();
        if len_sq < 1.0e-12 {
            return 0.0;
        }
        ((point - self.start).dot(v) / len_sq).clamp(0.0, 1.0)
    }
}

impl EdgeCurve for LineSegment {
    fn start(&self) -> Vec3 {
        self.start
    }

    fn end(&self) -> Vec3 {
        self.end
    }

    fn midpoint(&self) -> Vec3 {
        self.start.lerp(self.end, 0.5)
    }

    fn nearest_to_ray(&self, ray: &Ray3d) -> Vec3 {
        let t = match closest_parameters(self.start, self.vector(), ray.origin, *ray.direction) {
            Some((s, _)) => s.clamp(0.0, 1.0),
            None => self.clamp_parameter(ray.origin),
        };
        self.start + self.vector() * t
    }

    fn project(&self, point: Vec3) -> Vec<Vec3> {
        let v = self.vector();
        let len_sq = v.length_squared();
        if len_sq < 1.0e-12 {
            return Vec::new();
        }
        let t = (point - self.start).dot(v) / len_sq;
        if (0.0..=1.0).contains(&t) {
            vec![self.start + v * t]
        } else {
            Vec::new()
        }
    }

    fn intersect_axis(&self, axis: &Axis) -> Vec<Vec3> {
        let v = self.vector();
        let Some((s, t)) = closest_parameters(self.start, v, axis.origin, axis.direction) else {
            return Vec::new();
        };
        let p = self.start + v * s;
        let q = axis.point_at(t);
        let tolerance = INTERSECTION_TOLERANCE * (1.0 + p.abs().max_element());
        let on_segment = s >= -1.0e-5 && s <= 1.0 + 1.0e-5;
        if on_segment && t >= -tolerance && p.distance(q) <= tolerance {
            vec![p]
        } else {
            Vec::new()
        }
    }

    fn polyline(&self) -> Vec<Vec3> {
        vec![self.start, self.end]
    }
}
