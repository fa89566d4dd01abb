//! Test doubles shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::geometry::{EdgeCurve, LineSegment, Workplane};
use crate::notify::{NotificationBus, TipLevel};
use crate::view::{DetectedShape, ShapeFilter, ShapeGeometry, ShapeType, SnapView, ViewId};
use crate::visual::{MeshData, MeshHandle, VisualContext};

/// Top-down orthographic view of the XY plane, 10 px per world unit,
/// world origin at pixel (400, 300), screen y pointing down.
#[derive(Debug, Clone)]
pub struct TestView {
    pub id: ViewId,
    pub scale: f32,
    pub center: Vec2,
    pub shapes: Vec<DetectedShape>,
    pub detect_radius: f32,
}

impl TestView {
    pub fn new() -> Self {
        Self {
            id: ViewId(1),
            scale: 10.0,
            center: Vec2::new(400.0, 300.0),
            shapes: Vec::new(),
            detect_radius: 10.0,
        }
    }

    pub fn with_edge(mut self, owner: &str, start: Vec3, end: Vec3) -> Self {
        let edge: Arc<dyn EdgeCurve> = Arc::new(LineSegment::new(start, end));
        self.shapes.push(DetectedShape::edge(owner, edge));
        self
    }

    pub fn with_vertex(mut self, owner: &str, point: Vec3) -> Self {
        self.shapes.push(DetectedShape::vertex(owner, point));
        self
    }

    /// Pixel coordinates of a world point on the XY plane.
    pub fn screen(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.project(Vec3::new(x, y, 0.0));
        (p.x, p.y)
    }

    fn project(&self, point: Vec3) -> Vec2 {
        Vec2::new(
            self.center.x + point.x * self.scale,
            self.center.y - point.y * self.scale,
        )
    }

    fn shape_distance(&self, shape: &DetectedShape, pointer: Vec2) -> f32 {
        match &shape.geometry {
            ShapeGeometry::Vertex(p) => self.project(*p).distance(pointer),
            ShapeGeometry::Edge(edge) => {
                let a = self.project(edge.start());
                let b = self.project(edge.end());
                let ab = b - a;
                let t = if ab.length_squared() < 1e-9 {
                    0.0
                } else {
                    ((pointer - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
                };
                (a + ab * t).distance(pointer)
            }
        }
    }
}

impl SnapView for TestView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn ray_at(&self, x: f32, y: f32) -> Option<Ray3d> {
        let wx = (x - self.center.x) / self.scale;
        let wy = (self.center.y - y) / self.scale;
        Some(Ray3d::new(Vec3::new(wx, wy, 100.0), Dir3::NEG_Z))
    }

    fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        Some(self.project(point))
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
            .shapes
            .iter()
            .filter(|s| s.shape_type() == kind)
            .filter(|s| filter.is_none_or(|f| f(*s)))
            .map(|s| (self.shape_distance(s, pointer), s.clone()))
            .filter(|(d, _)| *d <= self.detect_radius)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.into_iter().map(|(_, s)| s).collect()
    }

    fn workplane(&self) -> Workplane {
        Workplane::xy()
    }
}

/// Visual context that records what is live.
#[derive(Debug, Default)]
pub struct TestVisuals {
    pub meshes: BTreeMap<MeshHandle, MeshData>,
    pub displayed: usize,
    pub failed_removals: usize,
    next: u64,
}

impl TestVisuals {
    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn guides(&self) -> Vec<(Vec3, Vec3)> {
        self.meshes
            .values()
            .filter_map(|m| match m {
                MeshData::Guide { start, end } => Some((*start, *end)),
                _ => None,
            })
            .collect()
    }
}

impl VisualContext for TestVisuals {
    fn display_mesh(&mut self, mesh: MeshData, _opacity: Option<f32>) -> MeshHandle {
        let handle = MeshHandle(self.next);
        self.next += 1;
        self.displayed += 1;
        self.meshes.insert(handle, mesh);
        handle
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> bool {
        let removed = self.meshes.remove(&handle).is_some();
        if !removed {
            self.failed_removals += 1;
        }
        removed
    }
}

/// Notification bus that keeps the latest state of every channel.
#[derive(Debug, Default)]
pub struct TestBus {
    pub float_tip: Option<String>,
    pub input: Option<String>,
    pub toasts: Vec<String>,
    pub input_clears: usize,
}

impl NotificationBus for TestBus {
    fn show_float_tip(&mut self, _level: TipLevel, message: &str) {
        self.float_tip = Some(message.to_string());
    }

    fn clear_float_tip(&mut self) {
        self.float_tip = None;
    }

    fn show_input(&mut self, prefix: &str) {
        self.input = Some(prefix.to_string());
    }

    fn clear_input(&mut self) {
        self.input = None;
        self.input_clears += 1;
    }

    fn show_toast(&mut self, message: &str) {
        self.toasts.push(message.to_string());
    }
}
