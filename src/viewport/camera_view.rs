//! [`SnapView`] over a Bevy camera and the scene resource.

use bevy::prelude::*;

use crate::geometry::Workplane;
use crate::view::{DetectedShape, ShapeFilter, ShapeGeometry, ShapeType, SnapView, ViewId};

use super::scene::SceneGeometry;

/// Pixel distance from `p` to the segment `a`-`b`.
pub fn segment_screen_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1.0e-9 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

pub struct CameraView<'a> {
    id: ViewId,
    camera: &'a Camera,
    transform: &'a GlobalTransform,
    scene: &'a SceneGeometry,
    plane: Workplane,
    /// Shapes farther than this many pixels from the pointer are not detected
    detect_radius: f32,
}

impl<'a> CameraView<'a> {
    pub fn new(
        id: ViewId,
        camera: &'a Camera,
        transform: &'a GlobalTransform,
        scene: &'a SceneGeometry,
        detect_radius: f32,
    ) -> Self {
        Self {
            id,
            camera,
            transform,
            scene,
            plane: Workplane::ground(),
            detect_radius,
        }
    }

    fn pixel_distance(&self, shape: &DetectedShape, pointer: Vec2) -> Option<f32> {
        match &shape.geometry {
            ShapeGeometry::Vertex(point) => Some(self.world_to_screen(*point)?.distance(pointer)),
            ShapeGeometry::Edge(edge) => {
                let points: Option<Vec<Vec2>> = edge
                    .polyline()
                    .into_iter()
                    .map(|p| self.world_to_screen(p))
                    .collect();
                points?
                    .windows(2)
                    .map(|pair| segment_screen_distance(pair[0], pair[1], pointer))
                    .min_by(|a, b| a.total_cmp(b))
            }
        }
    }
}

impl SnapView for CameraView<'_> {
    fn id(&self) -> ViewId {
        self.id
    }

    fn ray_at(&self, x: f32, y: f32) -> Option<Ray3d> {
        self.camera
            .viewport_to_world(self.transform, Vec2::new(x, y))
            .ok()
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        self.camera.world_to_viewport(self.transform, point).ok()
    }

    fn detect_shapes(
        &self,
        kind: ShapeType,
        x: f32,
        y: f32,
        filter: Option<&ShapeFilter>,
    ) -> Vec<DetectedShape> {
        let pointer = Vec2::new(x, y);
        let mut found: Vec<(f32, DetectedShape)> = self
            .scene
            .shapes(kind)
            .filter(|shape| filter.is_none_or(|f| f(shape)))
            .filter_map(|shape| Some((self.pixel_distance(&shape, pointer)?, shape)))
            .filter(|(distance, _)| *distance <= self.detect_radius)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.into_iter().map(|(_, shape)| shape).collect()
    }

    fn workplane(&self) -> Workplane {
        self.plane
    }
}
