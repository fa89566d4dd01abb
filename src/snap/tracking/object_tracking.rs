//! Tracking points picked up by resting the pointer on a geometry snap.

use std::time::Duration;

use bevy::prelude::*;

use crate::config::SnapConfig;
use crate::geometry::{axes_at_plane, Axis};
use crate::snap::SnapResult;
use crate::view::SnapView;
use crate::visual::{MeshData, MeshHandle, PointStyle, VisualContext};

/// Axes through one tracking point, tagged with the object it came from.
#[derive(Debug, Clone)]
pub struct TrackingRays {
    pub axes: Vec<Axis>,
    pub object_name: String,
}

#[derive(Debug)]
struct TrackingPoint {
    point: Vec3,
    owner: String,
    marker: MeshHandle,
}

#[derive(Debug)]
struct PendingTracking {
    point: Vec3,
    owner: String,
    due: Duration,
}

/// Dwell-activated tracking points.
///
/// Resting on a geometry snap for the configured dwell time toggles that point:
/// the first dwell adds it (with a marker), a second dwell removes it. One rest
/// fires at most once; the snap has to leave the point before it can re-arm.
#[derive(Debug, Default)]
pub struct ObjectTracking {
    points: Vec<TrackingPoint>,
    pending: Option<PendingTracking>,
    /// Point whose toggle last fired, while the snap is still on it
    fired: Option<Vec3>,
}

impl ObjectTracking {
    pub fn get_tracking_rays(&self, view: &dyn SnapView, config: &SnapConfig) -> Vec<TrackingRays> {
        let plane = view.workplane();
        self.points
            .iter()
            .map(|p| TrackingRays {
                axes: axes_at_plane(&plane.translate_to(p.point), config.tracking_z),
                object_name: p.owner.clone(),
            })
            .collect()
    }

    /// Arm the dwell timer for `snapped`, or disarm it when there is nothing to track.
    ///
    /// Re-arming on the point that is already pending keeps the original deadline.
    pub fn show_tracking_at_timeout(&mut self, snapped: Option<&SnapResult>, now: Duration, dwell: Duration) {
        let Some(snapped) = snapped.filter(|s| !s.shapes.is_empty()) else {
            self.pending = None;
            self.fired = None;
            return;
        };

        if let Some(fired) = self.fired {
            if same_point(fired, snapped.point) {
                return;
            }
            self.fired = None;
        }

        if let Some(pending) = &self.pending
            && same_point(pending.point, snapped.point)
        {
            return;
        }

        self.pending = Some(PendingTracking {
            point: snapped.point,
            owner: snapped.shapes[0].owner.clone(),
            due: now + dwell,
        });
    }

    /// Fire the pending toggle if its deadline has passed. Returns true when it fired.
    pub fn update(&mut self, now: Duration, visual: &mut dyn VisualContext) -> bool {
        if !self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.fired = Some(pending.point);

        if let Some(index) = self.points.iter().position(|p| same_point(p.point, pending.point)) {
            let removed = self.points.remove(index);
            visual.remove_mesh(removed.marker);
            debug!("Tracking point removed at {:?}", removed.point);
        } else {
            let marker = visual.display_mesh(
                MeshData::Point {
                    position: pending.point,
                    style: PointStyle::Tracking,
                },
                None,
            );
            debug!("Tracking point added at {:?} ({})", pending.point, pending.owner);
            self.points.push(TrackingPoint {
                point: pending.point,
                owner: pending.owner,
                marker,
            });
        }
        true
    }

    pub fn tracking_point_count(&self) -> usize {
        self.points.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self, visual: &mut dyn VisualContext) {
        self.pending = None;
        self.fired = None;
        for point in self.points.drain(..) {
            visual.remove_mesh(point.marker);
        }
    }
}

fn same_point(a: Vec3, b: Vec3) -> bool {
    a.distance_squared(b) < 1.0e-10
}
