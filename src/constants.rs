//! Centralized constants used across the engine.
//!
//! This module contains magic numbers and configuration defaults that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Default pixel radius within which a candidate is considered "near" the pointer
pub const DEFAULT_SNAP_DISTANCE: f32 = 10.0;

/// Default time the pointer has to rest on a geometry snap before it becomes a
/// tracking point
pub const DEFAULT_TRACKING_DWELL_MS: u64 = 600;

/// Default grid spacing in world units
pub const DEFAULT_GRID_SPACING: f32 = 1.0;

/// How far along an axis we walk before projecting, to get its screen direction
pub const AXIS_PROJECTION_LENGTH: f32 = 1.0e10;

/// Upper bound for any far point we project
pub const AXIS_PROJECTION_CAP: f32 = 1.0e20;

/// Guides are drawn this much past the snapped point (fraction of the offset)
pub const GUIDE_OVERSHOOT: f32 = 0.25;

/// Minimum guide length in world units, so a guide snapped at its origin is still visible
pub const GUIDE_MIN_LENGTH: f32 = 1.0;

/// Tolerance for treating two 3D lines as intersecting
pub const INTERSECTION_TOLERANCE: f32 = 1.0e-4;

/// Below this squared length a direction is considered degenerate
pub const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// Number of decimals shown for distances in the floating prompt
pub const PROMPT_DECIMALS: usize = 2;
