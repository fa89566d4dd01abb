//! Snap settings: persisted data, the runtime resource and change subscriptions.
//!
//! Pick sessions subscribe when they start and unsubscribe when they end. Every
//! setter records which setting changed for each live subscriber, and a session
//! drains its own queue at the start of each tick to decide whether provider
//! caches are stale.

mod settings;

pub use settings::{SettingKey, SnapSettings, SubscriptionId};

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GRID_SPACING, DEFAULT_SNAP_DISTANCE, DEFAULT_TRACKING_DWELL_MS,
};

bitflags! {
    /// Geometry features the object snap looks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SnapType: u32 {
        const ENDPOINT = 1;
        const MIDPOINT = 1 << 1;
        const PERPENDICULAR = 1 << 2;
        const NEAREST = 1 << 3;
        const VERTEX = 1 << 4;
    }
}

impl Default for SnapType {
    fn default() -> Self {
        SnapType::ENDPOINT | SnapType::MIDPOINT | SnapType::PERPENDICULAR | SnapType::VERTEX
    }
}

/// Snap configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Snap to geometry features under the pointer
    pub enable_snap: bool,
    /// Track alignment axes from the reference point and tracking points
    pub enable_snap_tracking: bool,
    /// Which geometry features count as snap points
    pub snap_type: SnapType,
    /// Pixel radius for every "is the pointer near this" test
    pub snap_distance: f32,
    /// Also track along the workplane normal
    pub tracking_z: bool,
    /// Polar tracking increment in degrees (None = only the plane axes)
    pub tracking_angle: Option<f32>,
    /// Round plane snaps to the grid
    pub enable_grid: bool,
    pub grid_spacing: f32,
    /// How long the pointer rests on a snap before it becomes a tracking point
    pub tracking_dwell_ms: u64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enable_snap: true,
            enable_snap_tracking: true,
            snap_type: SnapType::default(),
            snap_distance: DEFAULT_SNAP_DISTANCE,
            tracking_z: true,
            tracking_angle: None,
            enable_grid: false,
            grid_spacing: DEFAULT_GRID_SPACING,
            tracking_dwell_ms: DEFAULT_TRACKING_DWELL_MS,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to flip one of the snap switches
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSnapRequest {
    ObjectSnap,
    Tracking,
    Grid,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: SnapConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from disk
fn load_config(path: &std::path::Path) -> LoadConfigResult {
    let (data, reset_reason) = if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded snap config from {:?}", path);
                    (data, None)
                }
                Err(e) => {
                    warn!("Failed to parse snap config file: {}", e);
                    (
                        SnapConfig::default(),
                        Some(format!("Snap configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read snap config file: {}", e);
                (
                    SnapConfig::default(),
                    Some(format!("Could not read snap configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No snap config file found, using defaults");
        (SnapConfig::default(), None)
    };

    LoadConfigResult { data, reset_reason }
}

/// Save configuration to disk
fn save_config(settings: &SnapSettings) {
    match serde_json::to_string_pretty(settings.config()) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&settings.config_path, json) {
                error!("Failed to save snap config: {}", e);
            } else {
                info!("Snap config saved to {:?}", settings.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize snap config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut settings: ResMut<SnapSettings>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&settings.config_path);
    settings.replace(result.data);
    settings.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut settings: ResMut<SnapSettings>,
) {
    for _ in events.read() {
        if settings.dirty {
            save_config(&settings);
            settings.dirty = false;
        }
    }
}

/// System to apply toggle requests
fn toggle_snap_system(
    mut events: MessageReader<ToggleSnapRequest>,
    mut settings: ResMut<SnapSettings>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let enabled = match event {
            ToggleSnapRequest::ObjectSnap => {
                let value = !settings.config().enable_snap;
                settings.set_enable_snap(value);
                value
            }
            ToggleSnapRequest::Tracking => {
                let value = !settings.config().enable_snap_tracking;
                settings.set_enable_snap_tracking(value);
                value
            }
            ToggleSnapRequest::Grid => {
                let value = !settings.config().enable_grid;
                settings.set_enable_grid(value);
                value
            }
        };
        info!("{:?} {}", event, if enabled { "on" } else { "off" });
        save_events.write(SaveConfigRequest);
    }
}

/// F3 object snap, F11 tracking, F9 grid
fn handle_snap_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut toggles: MessageWriter<ToggleSnapRequest>,
    mut contexts: EguiContexts,
) {
    // Don't toggle while typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::F3) {
        toggles.write(ToggleSnapRequest::ObjectSnap);
    }
    if keyboard.just_pressed(KeyCode::F11) {
        toggles.write(ToggleSnapRequest::Tracking);
    }
    if keyboard.just_pressed(KeyCode::F9) {
        toggles.write(ToggleSnapRequest::Grid);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SnapSettings>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<ToggleSnapRequest>()
            .add_systems(Startup, load_config_system)
            .add_systems(
                Update,
                (
                    handle_snap_shortcuts,
                    toggle_snap_system.run_if(on_message::<ToggleSnapRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
