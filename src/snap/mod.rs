//! Snap providers: independent strategies that turn a pointer position into a 3D point.
//!
//! A pick session consults its providers in order and keeps the first result
//! that passes validation. Each provider owns the temporary visuals it creates
//! and releases them in [`Snap::remove_dynamic_object`].
//!
//! ## Module Structure
//!
//! - [`object_snap`] - Geometry features (endpoints, midpoints, ...) under the pointer
//! - [`tracking`] - Alignment axes from the reference point and tracking points
//! - [`plane_snap`] - Pointer ray on the working plane, optionally on the grid

mod object_snap;
mod plane_snap;
pub mod tracking;

pub use object_snap::ObjectSnap;
pub use plane_snap::{snap_to_grid, PlaneSnap};
pub use tracking::{AxisTracking, ObjectTracking, TrackingData, TrackingRays, TrackingSnap};

use std::time::Duration;

use bevy::prelude::*;

use crate::config::SnapConfig;
use crate::view::{DetectedShape, SnapView, ViewId};
use crate::visual::VisualContext;

/// Prompt label for any snap that lands on the crossing of two things.
pub const INTERSECTION_LABEL: &str = "Intersection";

/// The resolved point for one tick.
#[derive(Debug, Clone)]
pub struct SnapResult {
    pub view: ViewId,
    pub point: Vec3,
    pub info: Option<String>,
    /// Geometry that took part in the snap; empty for pure tracking snaps
    pub shapes: Vec<DetectedShape>,
    /// Anchor the displayed offset distance is measured from
    pub ref_point: Option<Vec3>,
    pub distance: Option<f32>,
}

impl SnapResult {
    pub fn at(view: ViewId, point: Vec3) -> Self {
        Self {
            view,
            point,
            info: None,
            shapes: Vec::new(),
            ref_point: None,
            distance: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Offset from the anchor, if there is one.
    pub fn offset_distance(&self) -> Option<f32> {
        self.distance
            .or_else(|| self.ref_point.map(|r| r.distance(self.point)))
    }
}

/// Everything a provider may look at during one tick.
pub struct SnapContext<'a> {
    pub view: &'a dyn SnapView,
    pub mx: f32,
    pub my: f32,
    /// Shapes detected under the pointer, nearest first
    pub shapes: &'a [DetectedShape],
    pub config: &'a SnapConfig,
    pub now: Duration,
}

pub trait Snap: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn snap(&mut self, ctx: &SnapContext<'_>, visual: &mut dyn VisualContext) -> Option<SnapResult>;

    /// Called with the overall winner of the tick, whichever provider produced it.
    fn handle_snapped(
        &mut self,
        _ctx: &SnapContext<'_>,
        _visual: &mut dyn VisualContext,
        _snapped: Option<&SnapResult>,
    ) {
    }

    /// Called every frame so time-based feedback can fire without pointer motion.
    fn update(&mut self, _now: Duration, _visual: &mut dyn VisualContext) {}

    /// Release every visual this provider created. Must be idempotent.
    fn remove_dynamic_object(&mut self, visual: &mut dyn VisualContext);

    /// Release visuals and drop internal caches.
    fn clear(&mut self, visual: &mut dyn VisualContext);
}
