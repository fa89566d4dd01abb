//! The fallback snap: wherever the pointer ray meets the working plane.

use bevy::prelude::*;

use crate::geometry::Workplane;
use crate::snap::{Snap, SnapContext, SnapResult};
use crate::visual::VisualContext;

/// Snap in-plane coordinates to the nearest grid intersection
pub fn snap_to_grid(position: Vec2, grid_size: f32, snap_enabled: bool) -> Vec2 {
    if !snap_enabled || grid_size <= 0.0 {
        return position;
    }

    Vec2::new(
        (position.x / grid_size).round() * grid_size,
        (position.y / grid_size).round() * grid_size,
    )
}

/// Intersects the pointer ray with a plane (the view's workplane unless a
/// fixed plane was given), rounding to the grid when the grid is on.
#[derive(Debug, Default)]
pub struct PlaneSnap {
    plane: Option<Workplane>,
    reference_point: Option<Vec3>,
}

impl PlaneSnap {
    pub fn new(plane: Option<Workplane>, reference_point: Option<Vec3>) -> Self {
        Self {
            plane,
            reference_point,
        }
    }
}

impl Snap for PlaneSnap {
    fn name(&self) -> &'static str {
        "plane"
    }

    fn snap(&mut self, ctx: &SnapContext<'_>, _visual: &mut dyn VisualContext) -> Option<SnapResult> {
        let plane = self.plane.unwrap_or_else(|| ctx.view.workplane());
        let ray = ctx.view.ray_at(ctx.mx, ctx.my)?;
        let hit = plane.intersect_ray(&ray)?;

        let mut result = if ctx.config.enable_grid {
            let local = plane.to_local(hit);
            let snapped = snap_to_grid(local.truncate(), ctx.config.grid_spacing, true);
            SnapResult::at(ctx.view.id(), plane.from_local(snapped.extend(0.0))).with_info("Grid")
        } else {
            SnapResult::at(ctx.view.id(), hit)
        };
        result.ref_point = self.reference_point;
        Some(result)
    }

    // Nothing is displayed by this provider
    fn remove_dynamic_object(&mut self, _visual: &mut dyn VisualContext) {}

    fn clear(&mut self, _visual: &mut dyn VisualContext) {}
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::SnapConfig;
    use crate::testing::{TestView, TestVisuals};

    fn snap_at(snap: &mut PlaneSnap, config: &SnapConfig, world: (f32, f32)) -> Option<SnapResult> {
        let view = TestView::new();
        let mut visual = TestVisuals::default();
        let (mx, my) = view.screen(world.0, world.1);
        let ctx = SnapContext {
            view: &view,
            mx,
            my,
            shapes: &[],
            config,
            now: Duration::ZERO,
        };
        snap.snap(&ctx, &mut visual)
    }

    #[test]
    fn test_snap_disabled_returns_original() {
        let pos = Vec2::new(0.33, 0.47);
        assert_eq!(snap_to_grid(pos, 1.0, false), pos);
    }

    #[test]
    fn test_snap_to_nearest_intersection() {
        assert_eq!(snap_to_grid(Vec2::new(1.4, 2.6), 1.0, true), Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_snap_negative_coordinates() {
        assert_eq!(snap_to_grid(Vec2::new(-1.4, -2.6), 1.0, true), Vec2::new(-1.0, -3.0));
    }

    #[test]
    fn test_snap_different_grid_size() {
        assert_eq!(snap_to_grid(Vec2::new(7.0, 13.0), 5.0, true), Vec2::new(5.0, 15.0));
    }

    #[test]
    fn test_snap_zero_grid_is_identity() {
        let pos = Vec2::new(1.25, 2.5);
        assert_eq!(snap_to_grid(pos, 0.0, true), pos);
    }

    #[test]
    fn test_plane_snap_without_grid() {
        let mut snap = PlaneSnap::new(None, Some(Vec3::ZERO));
        let result = snap_at(&mut snap, &SnapConfig::default(), (2.3, -1.7)).unwrap();
        assert!(result.point.distance(Vec3::new(2.3, -1.7, 0.0)) < 1e-5);
        assert!(result.info.is_none());
        assert_eq!(result.ref_point, Some(Vec3::ZERO));
    }

    #[test]
    fn test_plane_snap_with_grid() {
        let config = SnapConfig {
            enable_grid: true,
            grid_spacing: 0.5,
            ..SnapConfig::default()
        };
        let mut snap = PlaneSnap::new(None, None);
        let result = snap_at(&mut snap, &config, (2.3, -1.7)).unwrap();
        assert!(result.point.distance(Vec3::new(2.5, -1.5, 0.0)) < 1e-5);
        assert_eq!(result.info.as_deref(), Some("Grid"));
    }

    #[test]
    fn test_fixed_plane_parallel_to_view_ray_misses() {
        let plane = Workplane::new(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        let mut snap = PlaneSnap::new(Some(plane), None);
        assert!(snap_at(&mut snap, &SnapConfig::default(), (1.0, 1.0)).is_none());
    }
}
