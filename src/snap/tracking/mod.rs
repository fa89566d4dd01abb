//! Alignment tracking: candidate generators plus the scorer that picks a point.
//!
//! ## Module Structure
//!
//! - [`axis_tracking`] - Axes through the session's reference point
//! - [`object_tracking`] - Axes through dwell-activated tracking points
//! - [`tracking_snap`] - Screen-space scoring and the selection priority
//!
//! ## Selection priority
//!
//! 1. The detected edge crossing a candidate axis (nearest crossing on screen)
//! 2. A single surviving axis: its nearest point
//! 3. The crossing of the two best axes
//! 4. The best axis alone when those two do not meet

mod axis_tracking;
mod object_tracking;
mod tracking_snap;

#[cfg(test)]
mod tests;

pub use axis_tracking::AxisTracking;
pub use object_tracking::{ObjectTracking, TrackingRays};
pub use tracking_snap::{axis_screen_distance, TrackingData, TrackingSnap};
