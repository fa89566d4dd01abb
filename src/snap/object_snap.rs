//! Snapping to geometry features of the shapes under the pointer.

use bevy::prelude::*;

use crate::config::SnapType;
use crate::snap::{Snap, SnapContext, SnapResult};
use crate::view::{DetectedShape, ShapeGeometry, ViewId};
use crate::visual::{MeshData, TempVisuals, VisualContext};

/// One candidate feature point.
#[derive(Debug, Clone)]
struct Feature {
    kind: SnapType,
    point: Vec3,
    shape: usize,
}

/// Lower is preferred when several features are within reach.
fn priority(kind: SnapType) -> u8 {
    if kind == SnapType::ENDPOINT || kind == SnapType::VERTEX {
        0
    } else if kind == SnapType::MIDPOINT {
        1
    } else if kind == SnapType::PERPENDICULAR {
        2
    } else {
        3
    }
}

pub fn feature_label(kind: SnapType) -> &'static str {
    if kind == SnapType::ENDPOINT {
        "Endpoint"
    } else if kind == SnapType::MIDPOINT {
        "Midpoint"
    } else if kind == SnapType::PERPENDICULAR {
        "Perpendicular"
    } else if kind == SnapType::VERTEX {
        "Vertex"
    } else {
        "Nearest"
    }
}

/// Snaps to endpoints, midpoints, vertices, perpendicular feet from the
/// reference point, and the nearest point on an edge, as enabled by
/// [`SnapType`]. The edge the snap came from is highlighted.
#[derive(Debug, Default)]
pub struct ObjectSnap {
    reference_point: Option<Vec3>,
    highlights: TempVisuals,
}

impl ObjectSnap {
    pub fn new(reference_point: Option<Vec3>) -> Self {
        Self {
            reference_point,
            highlights: TempVisuals::default(),
        }
    }

    pub fn highlight_count(&self, view: ViewId) -> usize {
        self.highlights.count(view)
    }

    fn features(&self, ctx: &SnapContext<'_>) -> Vec<Feature> {
        let enabled = ctx.config.snap_type;
        let ray = ctx.view.ray_at(ctx.mx, ctx.my);
        let mut features = Vec::new();
        let mut push = |kind: SnapType, point: Vec3, shape: usize| {
            if enabled.contains(kind) {
                features.push(Feature { kind, point, shape });
            }
        };

        for (index, shape) in ctx.shapes.iter().enumerate() {
            match &shape.geometry {
                ShapeGeometry::Vertex(point) => push(SnapType::VERTEX, *point, index),
                ShapeGeometry::Edge(edge) => {
                    push(SnapType::ENDPOINT, edge.start(), index);
                    push(SnapType::ENDPOINT, edge.end(), index);
                    push(SnapType::MIDPOINT, edge.midpoint(), index);
                    if let Some(reference) = self.reference_point {
                        for foot in edge.project(reference) {
                            push(SnapType::PERPENDICULAR, foot, index);
                        }
                    }
                    if let Some(ray) = &ray {
                        push(SnapType::NEAREST, edge.nearest_to_ray(ray), index);
                    }
                }
            }
        }
        features
    }

    fn highlight(&mut self, view: ViewId, visual: &mut dyn VisualContext, shape: &DetectedShape) {
        if let Some(edge) = shape.as_edge() {
            let mesh = MeshData::Polyline {
                points: edge.polyline(),
                highlight: true,
            };
            self.highlights.display(view, visual, mesh, None);
        }
    }
}

impl Snap for ObjectSnap {
    fn name(&self) -> &'static str {
        "object"
    }

    fn snap(&mut self, ctx: &SnapContext<'_>, visual: &mut dyn VisualContext) -> Option<SnapResult> {
        self.highlights.release_view(ctx.view.id(), visual);
        if !ctx.config.enable_snap || ctx.shapes.is_empty() {
            return None;
        }

        let threshold = ctx.config.snap_distance;
        let best = self
            .features(ctx)
            .into_iter()
            .map(|f| (ctx.view.screen_distance(ctx.mx, ctx.my, f.point), f))
            .filter(|(distance, _)| *distance <= threshold)
            .min_by(|(da, a), (db, b)| {
                priority(a.kind)
                    .cmp(&priority(b.kind))
                    .then(da.total_cmp(db))
            })
            .map(|(_, f)| f)?;

        let shape = &ctx.shapes[best.shape];
        self.highlight(ctx.view.id(), visual, shape);

        let mut result = SnapResult::at(ctx.view.id(), best.point).with_info(feature_label(best.kind));
        result.shapes.push(shape.clone());
        result.ref_point = self.reference_point;
        Some(result)
    }

    fn remove_dynamic_object(&mut self, visual: &mut dyn VisualContext) {
        self.highlights.release_all(visual);
    }

    fn clear(&mut self, visual: &mut dyn VisualContext) {
        self.highlights.release_all(visual);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::SnapConfig;
    use crate::testing::{TestView, TestVisuals};
    use crate::view::{ShapeType, SnapView};

    fn snap_at(
        snap: &mut ObjectSnap,
        view: &TestView,
        visual: &mut TestVisuals,
        config: &SnapConfig,
        world: (f32, f32),
    ) -> Option<SnapResult> {
        let (mx, my) = view.screen(world.0, world.1);
        let mut shapes = view.detect_shapes(ShapeType::Vertex, mx, my, None);
        shapes.extend(view.detect_shapes(ShapeType::Edge, mx, my, None));
        let ctx = SnapContext {
            view,
            mx,
            my,
            shapes: &shapes,
            config,
            now: Duration::ZERO,
        };
        snap.snap(&ctx, visual)
    }

    fn wall() -> TestView {
        TestView::new().with_edge("Wall", Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_snaps_to_endpoint_near_pointer() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);

        let result = snap_at(&mut snap, &view, &mut visual, &SnapConfig::default(), (9.6, 0.2)).unwrap();

        assert_eq!(result.point, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(result.info.as_deref(), Some("Endpoint"));
        assert_eq!(result.shapes.len(), 1);
        assert_eq!(snap.highlight_count(view.id()), 1);
    }

    #[test]
    fn test_snaps_to_midpoint() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);

        let result = snap_at(&mut snap, &view, &mut visual, &SnapConfig::default(), (5.3, 0.1)).unwrap();

        assert_eq!(result.point, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(result.info.as_deref(), Some("Midpoint"));
    }

    #[test]
    fn test_perpendicular_foot_from_reference() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(Some(Vec3::new(2.0, 6.0, 0.0)));

        let result = snap_at(&mut snap, &view, &mut visual, &SnapConfig::default(), (2.4, 0.0)).unwrap();

        assert_eq!(result.point, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(result.info.as_deref(), Some("Perpendicular"));
        assert_eq!(result.ref_point, Some(Vec3::new(2.0, 6.0, 0.0)));
    }

    #[test]
    fn test_nearest_only_when_enabled() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);
        assert!(snap_at(&mut snap, &view, &mut visual, &SnapConfig::default(), (3.0, 0.3)).is_none());

        let config = SnapConfig {
            snap_type: SnapType::NEAREST,
            ..SnapConfig::default()
        };
        let result = snap_at(&mut snap, &view, &mut visual, &config, (3.0, 0.3)).unwrap();
        assert!(result.point.distance(Vec3::new(3.0, 0.0, 0.0)) < 1e-4);
        assert_eq!(result.info.as_deref(), Some("Nearest"));
    }

    #[test]
    fn test_vertex_snap() {
        let view = TestView::new().with_vertex("Peg", Vec3::new(-2.0, 3.0, 0.0));
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);

        let result = snap_at(&mut snap, &view, &mut visual, &SnapConfig::default(), (-1.7, 3.1)).unwrap();

        assert_eq!(result.point, Vec3::new(-2.0, 3.0, 0.0));
        assert_eq!(result.info.as_deref(), Some("Vertex"));
        assert_eq!(snap.highlight_count(view.id()), 0);
    }

    #[test]
    fn test_disabled_snap_returns_none() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);
        let config = SnapConfig {
            enable_snap: false,
            ..SnapConfig::default()
        };
        assert!(snap_at(&mut snap, &view, &mut visual, &config, (9.9, 0.0)).is_none());
    }

    #[test]
    fn test_highlight_replaced_and_removed() {
        let view = wall();
        let mut visual = TestVisuals::default();
        let mut snap = ObjectSnap::new(None);
        let config = SnapConfig::default();
        snap_at(&mut snap, &view, &mut visual, &config, (9.9, 0.0));
        snap_at(&mut snap, &view, &mut visual, &config, (0.1, 0.0));
        assert_eq!(visual.live_count(), 1);

        snap.remove_dynamic_object(&mut visual);
        snap.remove_dynamic_object(&mut visual);
        assert_eq!(visual.live_count(), 0);
        assert_eq!(visual.failed_removals, 0);
    }
}
