use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::command::PolylineCommand;
use crate::config::{ConfigResetNotification, SnapSettings, ToggleSnapRequest};
use crate::theme;

use super::settings_dialog::SettingsDialogState;

fn toggle_button(ui: &mut egui::Ui, label: &str, shortcut: &str, on: bool) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).size(12.0).strong())
        .min_size(egui::vec2(0.0, 22.0))
        .selected(on);
    ui.add(button)
        .on_hover_text(format!("{} ({})", label, shortcut))
        .clicked()
}

/// Bottom bar with the snap switches and the active command's state
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    settings: Res<SnapSettings>,
    command: Res<PolylineCommand>,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut toggles: MessageWriter<ToggleSnapRequest>,
) -> Result {
    let config = settings.config();
    egui::TopBottomPanel::bottom("status_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 4))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                if toggle_button(ui, "OSNAP", "F3", config.enable_snap) {
                    toggles.write(ToggleSnapRequest::ObjectSnap);
                }
                if toggle_button(ui, "TRACK", "F11", config.enable_snap_tracking) {
                    toggles.write(ToggleSnapRequest::Tracking);
                }
                if toggle_button(ui, "GRID", "F9", config.enable_grid) {
                    toggles.write(ToggleSnapRequest::Grid);
                }
                if ui
                    .button(egui::RichText::new("⚙").size(14.0))
                    .on_hover_text("Snap settings")
                    .clicked()
                    && !dialog_state.is_open
                {
                    dialog_state.open(&settings);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let status = if command.is_active() {
                    format!(
                        "Polyline: {} point(s). Click to add, Enter to finish, Esc to stop",
                        command.points().len()
                    )
                } else {
                    "Press L to draw a polyline".to_string()
                };
                ui.label(egui::RichText::new(status).color(theme::ui::LABEL_TEXT));
            });
        });
    Ok(())
}

pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    let mut should_close = false;
    egui::Window::new("Snap Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Snap settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(reason).color(theme::ui::ERROR_TEXT));
            }
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                should_close = true;
            }
        });

    if should_close {
        notification.show = false;
        notification.reason = None;
    }
    Ok(())
}
