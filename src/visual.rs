//! Temporary visual feedback: the display contract and per-view handle bookkeeping.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::view::ViewId;

/// Opaque handle to something displayed in a visual context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStyle {
    /// The currently snapped point
    Snap,
    /// A dwell-activated object tracking point
    Tracking,
}

/// What to draw. Guides are dashed; polylines are solid.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshData {
    Point { position: Vec3, style: PointStyle },
    Guide { start: Vec3, end: Vec3 },
    Polyline { points: Vec<Vec3>, highlight: bool },
}

/// Display surface for temporary meshes.
///
/// Every handle returned by `display_mesh` is released with exactly one
/// `remove_mesh`; removing an unknown handle returns `false` and does nothing.
pub trait VisualContext {
    fn display_mesh(&mut self, mesh: MeshData, opacity: Option<f32>) -> MeshHandle;
    fn remove_mesh(&mut self, handle: MeshHandle) -> bool;
}

/// Handles created for each view during the current tick.
#[derive(Debug, Default)]
pub struct TempVisuals {
    by_view: HashMap<ViewId, Vec<MeshHandle>>,
}

impl TempVisuals {
    pub fn display(
        &mut self,
        view: ViewId,
        visual: &mut dyn VisualContext,
        mesh: MeshData,
        opacity: Option<f32>,
    ) -> MeshHandle {
        let handle = visual.display_mesh(mesh, opacity);
        self.by_view.entry(view).or_default().push(handle);
        handle
    }

    /// Remove everything recorded for `view`.
    pub fn release_view(&mut self, view: ViewId, visual: &mut dyn VisualContext) {
        if let Some(handles) = self.by_view.remove(&view) {
            for handle in handles {
                visual.remove_mesh(handle);
            }
        }
    }

    /// Remove everything for every view. Safe to call repeatedly.
    pub fn release_all(&mut self, visual: &mut dyn VisualContext) {
        for (_, handles) in self.by_view.drain() {
            for handle in handles {
                visual.remove_mesh(handle);
            }
        }
    }

    pub fn count(&self, view: ViewId) -> usize {
        self.by_view.get(&view).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_view.values().all(Vec::is_empty)
    }
}
