//! Unit tests for tracking candidate scoring and selection.

use std::time::Duration;

use bevy::prelude::*;

use crate::config::SnapConfig;
use crate::geometry::Axis;
use crate::snap::{Snap, SnapContext, SnapResult, INTERSECTION_LABEL};
use crate::testing::{TestView, TestVisuals};
use crate::view::{DetectedShape, ShapeType, SnapView};

use super::{axis_screen_distance, TrackingSnap};

fn ctx<'a>(
    view: &'a TestView,
    config: &'a SnapConfig,
    shapes: &'a [DetectedShape],
    world: (f32, f32),
) -> SnapContext<'a> {
    let (mx, my) = view.screen(world.0, world.1);
    SnapContext {
        view,
        mx,
        my,
        shapes,
        config,
        now: Duration::ZERO,
    }
}

/// Make `point` a tracking point by dwelling on it.
fn add_tracking_point(snap: &mut TrackingSnap, view: &TestView, visual: &mut TestVisuals, point: Vec3) {
    let config = SnapConfig::default();
    let mut result = SnapResult::at(view.id(), point);
    result.shapes.push(DetectedShape::vertex("Box", point));
    let context = ctx(view, &config, &[], (0.0, 0.0));
    snap.handle_snapped(&context, visual, Some(&result));
    snap.update(Duration::from_millis(config.tracking_dwell_ms), visual);
    assert_eq!(snap.object_tracking().tracking_point_count(), 1);
}

fn assert_near(actual: Vec3, expected: Vec3) {
    assert!(
        actual.distance(expected) < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn test_disabled_tracking_returns_none() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig {
        enable_snap_tracking: false,
        ..SnapConfig::default()
    };
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));

    assert!(snap.snap(&ctx(&view, &config, &[], (10.0, 0.5)), &mut visual).is_none());
    assert_eq!(visual.displayed, 0);
}

#[test]
fn test_no_candidates_returns_none() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));

    assert!(snap.snap(&ctx(&view, &config, &[], (10.0, 7.0)), &mut visual).is_none());
    assert_eq!(visual.live_count(), 0);
}

#[test]
fn test_no_reference_and_no_tracking_points_returns_none() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(None);

    assert!(snap.snap(&ctx(&view, &config, &[], (0.0, 0.0)), &mut visual).is_none());
}

#[test]
fn test_single_axis_near_x_axis() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));

    let result = snap
        .snap(&ctx(&view, &config, &[], (10.0, 0.5)), &mut visual)
        .unwrap();

    assert_near(result.point, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(result.info.as_deref(), Some("X axis"));
    assert_eq!(result.ref_point, Some(Vec3::ZERO));
    assert!((result.distance.unwrap() - 10.0).abs() < 1e-4);
    assert!(result.shapes.is_empty());
    assert_eq!(visual.guides().len(), 1);
}

#[test]
fn test_axis_behind_origin_is_excluded() {
    let view = TestView::new();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));

    // +X is 5 px away on screen but its nearest point lies behind the origin
    let data = snap.tracking_data(&ctx(&view, &config, &[], (-10.0, 0.5)));

    assert_eq!(data.len(), 1);
    assert_eq!(data[0].axis.direction, Vec3::NEG_X);
    for d in &data {
        assert!((d.point - d.axis.origin).dot(d.axis.direction) >= 0.0);
    }
}

#[test]
fn test_candidates_sorted_by_screen_distance() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::new(0.0, 4.0, 0.0)));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(3.0, 0.0, 0.0));

    let data = snap.tracking_data(&ctx(&view, &config, &[], (3.2, 4.3)));

    assert_eq!(data.len(), 2);
    assert!(data[0].is_object_tracking);
    assert_eq!(data[0].info, "Box");
    assert!((data[0].distance - 2.0).abs() < 1e-3);
    assert!(!data[1].is_object_tracking);
    assert!((data[1].distance - 3.0).abs() < 1e-3);
}

#[test]
fn test_equal_distances_keep_generator_order() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::new(0.0, 4.0, 0.0)));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(3.0, 0.0, 0.0));

    let data = snap.tracking_data(&ctx(&view, &config, &[], (3.25, 4.25)));

    assert_eq!(data.len(), 2);
    assert!(!data[0].is_object_tracking);
    assert!(data[1].is_object_tracking);
}

#[test]
fn test_reference_axis_and_tracking_ray_intersection() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::new(0.0, 4.0, 0.0)));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(3.0, 0.0, 0.0));

    let result = snap
        .snap(&ctx(&view, &config, &[], (3.2, 4.3)), &mut visual)
        .unwrap();

    assert_near(result.point, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(result.info.as_deref(), Some(INTERSECTION_LABEL));
    assert_eq!(visual.guides().len(), 2);
}

#[test]
fn test_intersection_independent_of_candidate_order() {
    let view = TestView::new();
    let config = SnapConfig::default();

    let mut visual_a = TestVisuals::default();
    let mut snap_a = TrackingSnap::new(Some(Vec3::new(0.0, 4.0, 0.0)));
    add_tracking_point(&mut snap_a, &view, &mut visual_a, Vec3::new(3.0, 0.0, 0.0));

    let mut visual_b = TestVisuals::default();
    let mut snap_b = TrackingSnap::new(Some(Vec3::new(3.0, 0.0, 0.0)));
    add_tracking_point(&mut snap_b, &view, &mut visual_b, Vec3::new(0.0, 4.0, 0.0));

    let a = snap_a
        .snap(&ctx(&view, &config, &[], (3.25, 4.25)), &mut visual_a)
        .unwrap();
    let b = snap_b
        .snap(&ctx(&view, &config, &[], (3.25, 4.25)), &mut visual_b)
        .unwrap();

    assert_near(a.point, Vec3::new(3.0, 4.0, 0.0));
    assert_near(b.point, a.point);
}

#[test]
fn test_parallel_axes_fall_back_to_nearest_axis() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(5.0, 0.2, 0.0));

    let near_reference = snap
        .snap(&ctx(&view, &config, &[], (8.0, 0.05)), &mut visual)
        .unwrap();
    assert_near(near_reference.point, Vec3::new(8.0, 0.0, 0.0));
    assert_eq!(near_reference.info.as_deref(), Some("X axis"));

    let near_tracking = snap
        .snap(&ctx(&view, &config, &[], (8.0, 0.15)), &mut visual)
        .unwrap();
    assert_near(near_tracking.point, Vec3::new(8.0, 0.2, 0.0));
    assert_eq!(near_tracking.ref_point, Some(Vec3::new(5.0, 0.2, 0.0)));
}

#[test]
fn test_edge_intersection_beats_axis_projection() {
    let view = TestView::new().with_edge(
        "Wall",
        Vec3::new(4.0, -5.0, 0.0),
        Vec3::new(6.0, 5.0, 0.0),
    );
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    let (mx, my) = view.screen(5.02, 0.1);
    let shapes = view.detect_shapes(ShapeType::Edge, mx, my, None);
    assert_eq!(shapes.len(), 1);

    let result = snap
        .snap(&ctx(&view, &config, &shapes, (5.02, 0.1)), &mut visual)
        .unwrap();

    assert_near(result.point, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(result.info.as_deref(), Some(INTERSECTION_LABEL));
    assert_eq!(result.shapes.len(), 1);
    assert_eq!(result.shapes[0].owner, "Wall");
    assert_eq!(visual.guides().len(), 1);
}

#[test]
fn test_nearby_vertex_does_not_hide_edge() {
    let view = TestView::new()
        .with_vertex("Post", Vec3::new(5.3, 0.6, 0.0))
        .with_edge("Wall", Vec3::new(4.0, -5.0, 0.0), Vec3::new(6.0, 5.0, 0.0));
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    let (mx, my) = view.screen(5.02, 0.1);
    let mut shapes = view.detect_shapes(ShapeType::Vertex, mx, my, None);
    shapes.extend(view.detect_shapes(ShapeType::Edge, mx, my, None));
    assert_eq!(shapes.len(), 2);
    assert!(shapes[0].as_edge().is_none());

    let result = snap
        .snap(&ctx(&view, &config, &shapes, (5.02, 0.1)), &mut visual)
        .unwrap();

    assert_near(result.point, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(result.info.as_deref(), Some(INTERSECTION_LABEL));
    assert_eq!(result.shapes[0].owner, "Wall");
}

#[test]
fn test_edge_without_crossing_uses_axis() {
    let view = TestView::new().with_edge(
        "Wall",
        Vec3::new(4.0, 0.3, 0.0),
        Vec3::new(6.0, 5.0, 0.0),
    );
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    let (mx, my) = view.screen(4.1, 0.2);
    let shapes = view.detect_shapes(ShapeType::Edge, mx, my, None);
    assert_eq!(shapes.len(), 1);

    let result = snap
        .snap(&ctx(&view, &config, &shapes, (4.1, 0.2)), &mut visual)
        .unwrap();

    assert_near(result.point, Vec3::new(4.1, 0.0, 0.0));
    assert_eq!(result.info.as_deref(), Some("X axis"));
}

#[test]
fn test_guides_replaced_every_tick() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::new(0.0, 4.0, 0.0)));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(3.0, 0.0, 0.0));
    // The tracking point marker stays for the whole session
    let markers = visual.live_count();

    let ticks = [(3.2, 4.3, 2), (10.0, 4.2, 1), (20.0, 20.0, 0), (3.1, 4.1, 2), (3.2, 9.0, 1)];
    for (x, y, expected) in ticks {
        snap.snap(&ctx(&view, &config, &[], (x, y)), &mut visual);
        assert_eq!(snap.guide_count(view.id()), expected, "tick at ({x}, {y})");
        assert_eq!(visual.live_count(), markers + expected);
    }
}

#[test]
fn test_remove_dynamic_object_is_idempotent() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let config = SnapConfig::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    snap.snap(&ctx(&view, &config, &[], (10.0, 0.5)), &mut visual);

    snap.remove_dynamic_object(&mut visual);
    snap.remove_dynamic_object(&mut visual);

    assert_eq!(visual.live_count(), 0);
    assert_eq!(visual.failed_removals, 0);
}

#[test]
fn test_clear_drops_tracking_points() {
    let view = TestView::new();
    let mut visual = TestVisuals::default();
    let mut snap = TrackingSnap::new(Some(Vec3::ZERO));
    add_tracking_point(&mut snap, &view, &mut visual, Vec3::new(3.0, 0.0, 0.0));

    snap.clear(&mut visual);

    assert_eq!(snap.object_tracking().tracking_point_count(), 0);
    assert_eq!(visual.live_count(), 0);
}

#[test]
fn test_screen_distance_of_axis_seen_end_on() {
    let view = TestView::new();
    let axis = Axis::new(Vec3::ZERO, Vec3::Z, "Z axis");
    let (mx, my) = view.screen(3.0, 4.0);
    let distance = axis_screen_distance(&view, mx, my, &axis).unwrap();
    assert!((distance - 50.0).abs() < 1e-3);
}

#[test]
fn test_screen_distance_is_perpendicular() {
    let view = TestView::new();
    let axis = Axis::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), "diagonal");
    let (mx, my) = view.screen(3.0, 2.0);
    let distance = axis_screen_distance(&view, mx, my, &axis).unwrap();
    assert!((distance - 10.0 / 2f32.sqrt()).abs() < 1e-2);
}
