//! The geometry shown in the viewport and offered to snapping.

use std::sync::Arc;

use bevy::prelude::*;

use crate::constants::DEGENERATE_LENGTH_SQ;
use crate::geometry::{EdgeCurve, LineSegment};
use crate::theme;
use crate::view::{DetectedShape, ShapeType};

/// A named object made of edges and free vertices.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub edges: Vec<Arc<dyn EdgeCurve>>,
    pub vertices: Vec<Vec3>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Adds a straight edge unless it has no length.
    pub fn push_segment(&mut self, start: Vec3, end: Vec3) {
        if start.distance_squared(end) > DEGENERATE_LENGTH_SQ {
            self.edges.push(Arc::new(LineSegment::new(start, end)));
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct SceneGeometry {
    objects: Vec<SceneObject>,
}

impl SceneGeometry {
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Open polyline through `points`.
    pub fn add_polyline(&mut self, name: impl Into<String>, points: &[Vec3]) {
        let mut object = SceneObject::new(name);
        for pair in points.windows(2) {
            object.push_segment(pair[0], pair[1]);
        }
        self.add_object(object);
    }

    /// Axis-aligned box outline: twelve edges, corners as vertices.
    pub fn add_box(&mut self, name: impl Into<String>, min: Vec3, max: Vec3) {
        let corner = |i: usize| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        let mut object = SceneObject::new(name);
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    object.push_segment(corner(i), corner(i | bit));
                }
            }
        }
        object.vertices = (0..8).map(corner).collect();
        self.add_object(object);
    }

    /// `"{prefix} {n}"` with the first `n` not already taken.
    pub fn next_name(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{prefix} {n}"))
            .find(|name| self.objects.iter().all(|o| &o.name != name))
            .unwrap_or_else(|| prefix.to_string())
    }

    /// Every shape of `kind`, tagged with its owner.
    pub fn shapes(&self, kind: ShapeType) -> impl Iterator<Item = DetectedShape> + '_ {
        self.objects.iter().flat_map(move |object| {
            let shapes: Vec<DetectedShape> = match kind {
                ShapeType::Vertex => object
                    .vertices
                    .iter()
                    .map(|v| DetectedShape::vertex(object.name.clone(), *v))
                    .collect(),
                ShapeType::Edge => object
                    .edges
                    .iter()
                    .map(|e| DetectedShape::edge(object.name.clone(), e.clone()))
                    .collect(),
            };
            shapes
        })
    }
}

pub fn spawn_demo_scene(mut scene: ResMut<SceneGeometry>) {
    scene.add_box("Block", Vec3::new(-4.0, 0.0, -3.0), Vec3::new(2.0, 3.0, 1.0));
    scene.add_polyline(
        "Wall",
        &[
            Vec3::new(5.0, 0.0, -6.0),
            Vec3::new(11.0, 0.0, -6.0),
            Vec3::new(11.0, 0.0, 2.0),
        ],
    );
    let mut marker = SceneObject::new("Survey point");
    marker.vertices.push(Vec3::new(-6.0, 0.0, 6.0));
    scene.add_object(marker);
    info!("Demo scene with {} objects", scene.objects().len());
}

pub fn draw_scene(mut gizmos: Gizmos, scene: Res<SceneGeometry>) {
    for object in scene.objects() {
        for edge in &object.edges {
            gizmos.linestrip(edge.polyline(), theme::SCENE_EDGE);
        }
        for vertex in &object.vertices {
            gizmos.sphere(Isometry3d::from_translation(*vertex), 0.08, theme::SCENE_VERTEX);
        }
    }
}
