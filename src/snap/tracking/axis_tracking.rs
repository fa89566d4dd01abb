//! Axes inferred from a fixed reference point.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::config::SnapConfig;
use crate::geometry::{axes_at_plane, polar_axes_at_plane, Axis};
use crate::view::{SnapView, ViewId};

/// Builds the tracking axes through the reference point, once per view.
///
/// The cache stays valid for as long as the reference point and the tracking
/// settings do; sessions call [`AxisTracking::clear`] when either changes.
#[derive(Debug, Default)]
pub struct AxisTracking {
    axes: HashMap<ViewId, Vec<Axis>>,
}

impl AxisTracking {
    pub fn get_axes(&mut self, view: &dyn SnapView, reference: Vec3, config: &SnapConfig) -> &[Axis] {
        self.axes.entry(view.id()).or_insert_with(|| {
            let plane = view.workplane().translate_to(reference);
            match config.tracking_angle {
                Some(angle) => polar_axes_at_plane(&plane, angle, config.tracking_z),
                None => axes_at_plane(&plane, config.tracking_z),
            }
        })
    }

    pub fn is_cached(&self, view: ViewId) -> bool {
        self.axes.contains_key(&view)
    }

    pub fn clear(&mut self) {
        self.axes.clear();
    }
}
