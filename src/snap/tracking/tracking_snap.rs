//! Candidate scoring and selection for alignment tracking.

use std::time::Duration;

use bevy::prelude::*;

use crate::constants::{
    AXIS_PROJECTION_CAP, AXIS_PROJECTION_LENGTH, GUIDE_MIN_LENGTH, GUIDE_OVERSHOOT,
};
use crate::geometry::Axis;
use crate::snap::{Snap, SnapContext, SnapResult, INTERSECTION_LABEL};
use crate::view::{DetectedShape, SnapView};
use crate::visual::{MeshData, TempVisuals, VisualContext};

use super::axis_tracking::AxisTracking;
use super::object_tracking::ObjectTracking;

/// One surviving candidate for the current tick.
#[derive(Debug, Clone)]
pub struct TrackingData {
    pub axis: Axis,
    /// Nearest point on `axis` to the pointer ray, never behind the axis origin
    pub point: Vec3,
    pub is_object_tracking: bool,
    /// Screen-space perpendicular distance in pixels
    pub distance: f32,
    /// Name of the object the axis was inferred from, or the axis name
    pub info: String,
}

/// Snaps the pointer onto alignment axes.
///
/// Candidates come from the reference point (if any) and from dwell-activated
/// tracking points. Each tick the guides drawn on the previous tick for the
/// same view are removed before new ones are created.
#[derive(Debug, Default)]
pub struct TrackingSnap {
    reference_point: Option<Vec3>,
    axis_tracking: AxisTracking,
    object_tracking: ObjectTracking,
    guides: TempVisuals,
}

impl TrackingSnap {
    pub fn new(reference_point: Option<Vec3>) -> Self {
        Self {
            reference_point,
            ..Default::default()
        }
    }

    pub fn object_tracking(&self) -> &ObjectTracking {
        &self.object_tracking
    }

    /// Live guide handles for a view.
    pub fn guide_count(&self, view: crate::view::ViewId) -> usize {
        self.guides.count(view)
    }

    /// All candidates within the pixel threshold, sorted nearest first.
    pub fn tracking_data(&mut self, ctx: &SnapContext<'_>) -> Vec<TrackingData> {
        let Some(ray) = ctx.view.ray_at(ctx.mx, ctx.my) else {
            return Vec::new();
        };

        let mut data = Vec::new();
        if let Some(reference) = self.reference_point {
            for axis in self.axis_tracking.get_axes(ctx.view, reference, ctx.config) {
                push_candidate(&mut data, ctx, &ray, axis, false, &axis.name);
            }
        }
        for rays in self.object_tracking.get_tracking_rays(ctx.view, ctx.config) {
            for axis in &rays.axes {
                push_candidate(&mut data, ctx, &ray, axis, true, &rays.object_name);
            }
        }

        // Stable: equal distances keep generator order
        data.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        data
    }

    fn select(
        &mut self,
        ctx: &SnapContext<'_>,
        visual: &mut dyn VisualContext,
        data: &[TrackingData],
    ) -> Option<SnapResult> {
        // Vertices are detected first; the edge branch looks past them
        if let Some(shape) = ctx.shapes.iter().find(|s| s.as_edge().is_some())
            && let Some(result) = self.edge_intersection(ctx, visual, data, shape)
        {
            return Some(result);
        }

        match data {
            [] => None,
            [single] => Some(self.snap_to_axis(ctx.view, visual, single)),
            [first, second, ..] => match first.axis.intersect(&second.axis) {
                Some(point) => {
                    self.show_guide(ctx.view, visual, &first.axis, point);
                    self.show_guide(ctx.view, visual, &second.axis, point);
                    Some(SnapResult::at(ctx.view.id(), point).with_info(INTERSECTION_LABEL))
                }
                None => Some(self.snap_to_axis(ctx.view, visual, first)),
            },
        }
    }

    fn edge_intersection(
        &mut self,
        ctx: &SnapContext<'_>,
        visual: &mut dyn VisualContext,
        data: &[TrackingData],
        shape: &DetectedShape,
    ) -> Option<SnapResult> {
        let edge = shape.as_edge()?;
        let (point, axis) = data
            .iter()
            .flat_map(|d| edge.intersect_axis(&d.axis).into_iter().map(move |p| (p, &d.axis)))
            .map(|(p, axis)| (ctx.view.screen_distance(ctx.mx, ctx.my, p), p, axis))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p, axis)| (p, axis))?;

        self.show_guide(ctx.view, visual, axis, point);
        let mut result = SnapResult::at(ctx.view.id(), point).with_info(INTERSECTION_LABEL);
        result.shapes.push(shape.clone());
        Some(result)
    }

    fn snap_to_axis(
        &mut self,
        view: &dyn SnapView,
        visual: &mut dyn VisualContext,
        data: &TrackingData,
    ) -> SnapResult {
        self.show_guide(view, visual, &data.axis, data.point);
        let mut result = SnapResult::at(view.id(), data.point).with_info(data.axis.name.clone());
        result.ref_point = Some(data.axis.origin);
        result.distance = Some(data.point.distance(data.axis.origin));
        result
    }

    /// Dashed guide from the axis origin to a little past `point`.
    fn show_guide(&mut self, view: &dyn SnapView, visual: &mut dyn VisualContext, axis: &Axis, point: Vec3) {
        if axis.is_degenerate() {
            return;
        }
        let reach = axis.parameter_of(point).max(0.0);
        let length = (reach * (1.0 + GUIDE_OVERSHOOT)).max(reach + GUIDE_MIN_LENGTH);
        let guide = MeshData::Guide {
            start: axis.origin,
            end: axis.point_at(length),
        };
        self.guides.display(view.id(), visual, guide, None);
    }
}

fn push_candidate(
    data: &mut Vec<TrackingData>,
    ctx: &SnapContext<'_>,
    ray: &Ray3d,
    axis: &Axis,
    is_object_tracking: bool,
    info: &str,
) {
    let Some(distance) = axis_screen_distance(ctx.view, ctx.mx, ctx.my, axis) else {
        return;
    };
    if distance > ctx.config.snap_distance {
        return;
    }
    let point = axis.nearest_to_ray(ray);
    if (point - axis.origin).dot(axis.direction) < 0.0 {
        return;
    }
    data.push(TrackingData {
        axis: axis.clone(),
        point,
        is_object_tracking,
        distance,
        info: info.to_string(),
    });
}

/// Perpendicular pixel distance from the pointer to an axis as drawn on screen.
///
/// An axis that projects to a single pixel (looking straight down it) is as far
/// away as its origin. `None` if the origin is not visible.
pub fn axis_screen_distance(view: &dyn SnapView, mx: f32, my: f32, axis: &Axis) -> Option<f32> {
    let start = view.world_to_screen(axis.origin)?;
    let offset = Vec2::new(mx, my) - start;
    if offset == Vec2::ZERO {
        return Some(0.0);
    }

    let reach = (AXIS_PROJECTION_LENGTH * (1.0 + axis.origin.abs().max_element()))
        .min(AXIS_PROJECTION_CAP);
    // Far points can fall outside the view frustum; any point ahead of the
    // origin gives the same screen direction while both are visible
    let end = view
        .world_to_screen(axis.point_at(reach))
        .or_else(|| view.world_to_screen(axis.point_at(1.0)));
    let Some(end) = end else {
        return Some(offset.length());
    };

    let projected = end - start;
    if !projected.is_finite() || projected.length_squared() < 1.0e-12 {
        return Some(offset.length());
    }
    let along = offset.dot(projected.normalize());
    Some((offset.length_squared() - along * along).max(0.0).sqrt())
}

impl Snap for TrackingSnap {
    fn name(&self) -> &'static str {
        "tracking"
    }

    fn snap(&mut self, ctx: &SnapContext<'_>, visual: &mut dyn VisualContext) -> Option<SnapResult> {
        self.guides.release_view(ctx.view.id(), visual);
        if !ctx.config.enable_snap_tracking {
            return None;
        }

        let data = self.tracking_data(ctx);
        if data.is_empty() {
            return None;
        }
        self.select(ctx, visual, &data)
    }

    fn handle_snapped(
        &mut self,
        ctx: &SnapContext<'_>,
        _visual: &mut dyn VisualContext,
        snapped: Option<&SnapResult>,
    ) {
        if !ctx.config.enable_snap_tracking {
            return;
        }
        let dwell = Duration::from_millis(ctx.config.tracking_dwell_ms);
        self.object_tracking.show_tracking_at_timeout(snapped, ctx.now, dwell);
    }

    fn update(&mut self, now: Duration, visual: &mut dyn VisualContext) {
        self.object_tracking.update(now, visual);
    }

    fn remove_dynamic_object(&mut self, visual: &mut dyn VisualContext) {
        self.guides.release_all(visual);
    }

    fn clear(&mut self, visual: &mut dyn VisualContext) {
        self.guides.release_all(visual);
        self.object_tracking.clear(visual);
        self.axis_tracking.clear();
    }
}
