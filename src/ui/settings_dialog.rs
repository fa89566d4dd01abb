use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{SaveConfigRequest, SnapConfig, SnapSettings, SnapType};
use crate::theme;

/// Snap kinds in the order the dialog lists them
const SNAP_KINDS: [(SnapType, &str); 5] = [
    (SnapType::ENDPOINT, "Endpoint"),
    (SnapType::MIDPOINT, "Midpoint"),
    (SnapType::PERPENDICULAR, "Perpendicular"),
    (SnapType::NEAREST, "Nearest"),
    (SnapType::VERTEX, "Vertex"),
];

/// Polar increment offered when polar tracking is switched on
const DEFAULT_POLAR_ANGLE: f32 = 45.0;

/// State for the snap settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub is_open: bool,
    /// Edited copy of the settings, applied on save
    pub draft: SnapConfig,
    /// Whether changes have been made
    pub has_changes: bool,
}

impl SettingsDialogState {
    /// Open the dialog on a fresh copy of the current settings
    pub fn open(&mut self, settings: &SnapSettings) {
        self.is_open = true;
        self.load_from_config(settings);
    }

    pub fn load_from_config(&mut self, settings: &SnapSettings) {
        self.draft = settings.config().clone();
        self.has_changes = false;
    }
}

/// Push every edited field through its setter so subscribers see what changed.
///
/// Setters ignore values they cannot hold (a non-positive grid spacing).
pub fn apply_draft(settings: &mut SnapSettings, draft: &SnapConfig) {
    settings.set_enable_snap(draft.enable_snap);
    settings.set_enable_snap_tracking(draft.enable_snap_tracking);
    settings.set_snap_type(draft.snap_type);
    settings.set_snap_distance(draft.snap_distance);
    settings.set_tracking_z(draft.tracking_z);
    settings.set_tracking_angle(draft.tracking_angle);
    settings.set_enable_grid(draft.enable_grid);
    settings.set_grid_spacing(draft.grid_spacing);
    settings.set_tracking_dwell_ms(draft.tracking_dwell_ms);
}

fn snap_section(ui: &mut egui::Ui, draft: &mut SnapConfig) -> bool {
    let mut changed = false;
    ui.group(|ui| {
        ui.label(egui::RichText::new("Object Snap").strong());
        ui.add_space(8.0);

        changed |= ui.checkbox(&mut draft.enable_snap, "Snap to geometry").changed();
        ui.add_enabled_ui(draft.enable_snap, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (kind, label) in SNAP_KINDS {
                    let mut on = draft.snap_type.contains(kind);
                    if ui.checkbox(&mut on, label).changed() {
                        draft.snap_type.set(kind, on);
                        changed = true;
                    }
                }
            });
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Pick radius:");
            changed |= ui
                .add(egui::DragValue::new(&mut draft.snap_distance).range(1.0..=50.0).suffix(" px"))
                .changed();
        });
    });
    changed
}

fn tracking_section(ui: &mut egui::Ui, draft: &mut SnapConfig) -> bool {
    let mut changed = false;
    ui.group(|ui| {
        ui.label(egui::RichText::new("Tracking").strong());
        ui.add_space(8.0);

        changed |= ui
            .checkbox(&mut draft.enable_snap_tracking, "Track alignment axes")
            .changed();
        ui.add_enabled_ui(draft.enable_snap_tracking, |ui| {
            changed |= ui
                .checkbox(&mut draft.tracking_z, "Track along the plane normal")
                .changed();

            ui.horizontal(|ui| {
                let mut polar = draft.tracking_angle.is_some();
                if ui.checkbox(&mut polar, "Polar increment:").changed() {
                    draft.tracking_angle = polar.then_some(DEFAULT_POLAR_ANGLE);
                    changed = true;
                }
                if let Some(angle) = draft.tracking_angle.as_mut() {
                    changed |= ui
                        .add(egui::DragValue::new(angle).range(1.0..=90.0).suffix("°"))
                        .changed();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Dwell before tracking a point:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut draft.tracking_dwell_ms)
                            .range(100..=3000)
                            .suffix(" ms"),
                    )
                    .changed();
            });
        });
    });
    changed
}

fn grid_section(ui: &mut egui::Ui, draft: &mut SnapConfig) -> bool {
    let mut changed = false;
    ui.group(|ui| {
        ui.label(egui::RichText::new("Grid").strong());
        ui.add_space(8.0);

        changed |= ui.checkbox(&mut draft.enable_grid, "Round free points to the grid").changed();
        ui.horizontal(|ui| {
            ui.label("Spacing:");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut draft.grid_spacing)
                        .range(0.01..=100.0)
                        .speed(0.05),
                )
                .changed();
        });
    });
    changed
}

/// Renders the snap settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut settings: ResMut<SnapSettings>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_save = false;

    egui::Window::new("Snap Settings")
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            let state = &mut *dialog_state;
            state.has_changes |= snap_section(ui, &mut state.draft);
            ui.add_space(12.0);
            state.has_changes |= tracking_section(ui, &mut state.draft);
            ui.add_space(12.0);
            state.has_changes |= grid_section(ui, &mut state.draft);

            ui.add_space(8.0);
            ui.label(
                egui::RichText::new("Dwelling again on a tracked point removes it.")
                    .small()
                    .color(theme::ui::HINT_TEXT),
            );
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(state.has_changes, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        apply_draft(&mut settings, &dialog_state.draft);
        save_events.write(SaveConfigRequest);
        info!("Snap settings updated");
        should_close = true;
    }

    if should_close {
        dialog_state.is_open = false;
        dialog_state.load_from_config(&settings);
    }

    Ok(())
}
