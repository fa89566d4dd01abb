//! Temporary snap feedback drawn with gizmos.
//!
//! [`GuideMeshes`] is the visual context pick sessions display into. Nothing
//! is spawned: every live handle is redrawn each frame until it is removed.

use std::collections::BTreeMap;

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::theme;
use crate::visual::{MeshData, MeshHandle, PointStyle, VisualContext};

/// Custom gizmo group so snap feedback draws over scene geometry
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct GuideGizmoGroup;

pub fn configure_guide_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<GuideGizmoGroup>();
    config.depth_bias = -1.0;
    config.line.width = 2.0;
}

const DASH_LENGTH: f32 = 0.3;
const DASH_GAP: f32 = 0.2;
/// Long guides get longer dashes rather than more of them
const MAX_DASHES: usize = 400;

/// Split `start`-`end` into dashes. Empty for a zero-length segment.
pub fn dash_segments(start: Vec3, end: Vec3, dash: f32, gap: f32, max_dashes: usize) -> Vec<(Vec3, Vec3)> {
    let length = start.distance(end);
    if length <= f32::EPSILON || dash <= 0.0 || max_dashes == 0 {
        return Vec::new();
    }
    let direction = (end - start) / length;

    let mut dash = dash;
    let mut period = dash + gap.max(0.0);
    let mut count = (length / period).ceil() as usize;
    if count > max_dashes {
        let scale = length / (max_dashes as f32 * period);
        dash *= scale;
        period *= scale;
        count = max_dashes;
    }

    (0..count)
        .map(|i| {
            let from = i as f32 * period;
            let to = (from + dash).min(length);
            (start + direction * from, start + direction * to)
        })
        .collect()
}

#[derive(Resource, Debug, Default)]
pub struct GuideMeshes {
    meshes: BTreeMap<MeshHandle, (MeshData, f32)>,
    next_handle: u64,
}

impl GuideMeshes {
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl VisualContext for GuideMeshes {
    fn display_mesh(&mut self, mesh: MeshData, opacity: Option<f32>) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, (mesh, opacity.unwrap_or(1.0).clamp(0.0, 1.0)));
        handle
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> bool {
        let removed = self.meshes.remove(&handle).is_some();
        if !removed {
            warn!("Removing unknown mesh handle {:?}", handle);
        }
        removed
    }
}

pub fn draw_guides(mut gizmos: Gizmos<GuideGizmoGroup>, meshes: Res<GuideMeshes>) {
    for (mesh, opacity) in meshes.meshes.values() {
        match mesh {
            MeshData::Guide { start, end } => {
                let color = theme::GUIDE.with_alpha(theme::GUIDE.alpha() * opacity);
                for (a, b) in dash_segments(*start, *end, DASH_LENGTH, DASH_GAP, MAX_DASHES) {
                    gizmos.line(a, b, color);
                }
            }
            MeshData::Point { position, style } => {
                let isometry = Isometry3d::from_translation(*position);
                match style {
                    PointStyle::Snap => {
                        gizmos.sphere(isometry, 0.15, theme::SNAP_MARKER.with_alpha(*opacity));
                    }
                    PointStyle::Tracking => {
                        gizmos.cross(isometry, 0.25, theme::TRACKING_MARKER.with_alpha(*opacity));
                    }
                }
            }
            MeshData::Polyline { points, highlight } => {
                let base = if *highlight {
                    theme::HIGHLIGHT
                } else {
                    theme::PREVIEW
                };
                gizmos.linestrip(points.iter().copied(), base.with_alpha(base.alpha() * opacity));
            }
        }
    }
}
