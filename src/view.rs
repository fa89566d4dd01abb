//! The viewport contract the engine queries every pointer tick.
//!
//! A view answers pure questions: where does a pixel look in the world, where
//! does a world point land on screen, and what geometry sits under a pixel.
//! [`crate::viewport::CameraView`] implements it over a Bevy camera; tests use a
//! top-down orthographic view.

use std::sync::Arc;

use bevy::prelude::*;

use crate::geometry::{EdgeCurve, Workplane};

/// Identity of a viewport, used to key per-view caches and visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ViewId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Vertex,
    Edge,
}

#[derive(Debug, Clone)]
pub enum ShapeGeometry {
    Vertex(Vec3),
    Edge(Arc<dyn EdgeCurve>),
}

/// A piece of geometry found under the pointer, with the name of the object owning it.
#[derive(Debug, Clone)]
pub struct DetectedShape {
    pub owner: String,
    pub geometry: ShapeGeometry,
}

impl DetectedShape {
    pub fn vertex(owner: impl Into<String>, point: Vec3) -> Self {
        Self {
            owner: owner.into(),
            geometry: ShapeGeometry::Vertex(point),
        }
    }

    pub fn edge(owner: impl Into<String>, edge: Arc<dyn EdgeCurve>) -> Self {
        Self {
            owner: owner.into(),
            geometry: ShapeGeometry::Edge(edge),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self.geometry {
            ShapeGeometry::Vertex(_) => ShapeType::Vertex,
            ShapeGeometry::Edge(_) => ShapeType::Edge,
        }
    }

    pub fn as_edge(&self) -> Option<&dyn EdgeCurve> {
        match &self.geometry {
            ShapeGeometry::Edge(edge) => Some(edge.as_ref()),
            ShapeGeometry::Vertex(_) => None,
        }
    }
}

/// Caller-supplied predicate restricting which shapes may be detected.
pub type ShapeFilter = Arc<dyn Fn(&DetectedShape) -> bool + Send + Sync>;

pub trait SnapView {
    fn id(&self) -> ViewId;

    /// World-space ray through the given viewport pixel.
    fn ray_at(&self, x: f32, y: f32) -> Option<Ray3d>;

    /// Viewport pixel a world point projects to.
    fn world_to_screen(&self, point: Vec3) -> Option<Vec2>;

    /// Shapes of the given kind near the pixel, nearest first.
    fn detect_shapes(
        &self,
        kind: ShapeType,
        x: f32,
        y: f32,
        filter: Option<&ShapeFilter>,
    ) -> Vec<DetectedShape>;

    fn workplane(&self) -> Workplane;

    /// Pixel distance between the pointer and a world point.
    ///
    /// Points that cannot be projected are infinitely far away.
    fn screen_distance(&self, x: f32, y: f32, point: Vec3) -> f32 {
        self.world_to_screen(point)
            .map(|p| p.distance(Vec2::new(x, y)))
            .unwrap_or(f32::INFINITY)
    }
}
