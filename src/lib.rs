//! Point snapping and alignment tracking for 3D CAD viewports.
//!
//! The engine core (`geometry`, `snap`, `pick`) only talks to the host through
//! the [`SnapView`], [`VisualContext`] and [`NotificationBus`] traits. The
//! `viewport`, `ui` and `command` modules bind it to a Bevy + egui editor.

pub mod command;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod notify;
pub mod paths;
pub mod pick;
pub mod snap;
pub mod theme;
pub mod ui;
pub mod view;
pub mod viewport;
pub mod visual;

#[cfg(test)]
mod testing;

pub use config::{SnapConfig, SnapSettings, SnapType};
pub use geometry::{Axis, EdgeCurve, LineSegment, Workplane};
pub use notify::{NotificationBus, TipLevel};
pub use pick::{PickEnv, PickOutcome, PointSnapData, SnapEventHandler};
pub use snap::{ObjectSnap, PlaneSnap, Snap, SnapContext, SnapResult, TrackingSnap};
pub use view::{DetectedShape, ShapeType, SnapView, ViewId};
pub use visual::{MeshData, MeshHandle, PointStyle, VisualContext};
