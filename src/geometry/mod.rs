//! Geometry primitives used by the snapping engine.
//!
//! ## Module Structure
//!
//! - [`axis`] - Named tracking axes, line-line math and axis sets on a plane
//! - [`plane`] - Working planes with an in-plane frame
//! - [`edge`] - The edge queries the engine needs from the shape kernel

mod axis;
mod edge;
mod plane;

pub use axis::{axes_at_plane, closest_parameters, polar_axes_at_plane, Axis, NORMAL_AXIS_LABEL};
pub use edge::{EdgeCurve, LineSegment};
pub use plane::Workplane;
