//! Centralized color theme for the application.
//!
//! This module provides all colors used in the viewport and the egui overlays.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;

// ============================================================================
// Scene Colors
// ============================================================================

/// Light grey for scene edges
pub const SCENE_EDGE: Color = Color::srgb(0.8, 0.8, 0.85);

/// Pale yellow for free scene vertices
pub const SCENE_VERTEX: Color = Color::srgb(0.95, 0.9, 0.5);

/// Semi-transparent grey grid lines
pub const GRID_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.3);

// ============================================================================
// Snap Feedback Colors
// ============================================================================

/// Green dashed tracking guides
pub const GUIDE: Color = Color::srgba(0.3, 0.9, 0.4, 0.9);

/// Yellow marker on the snapped point
pub const SNAP_MARKER: Color = Color::srgb(1.0, 0.85, 0.1);

/// Cyan cross on dwell-activated tracking points
pub const TRACKING_MARKER: Color = Color::srgb(0.2, 0.85, 1.0);

/// Light blue highlight for the edge a snap came from
pub const HIGHLIGHT: Color = Color::srgba(0.2, 0.6, 1.0, 0.9);

/// White preview of the geometry being drawn
pub const PREVIEW: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background (status bar)
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Floating snap tip text
    pub const TIP_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);

    /// Floating tip text for warnings
    pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 190, 80);

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 110, 110);
}
