//! Cursor-side feedback: the floating tip, the numeric entry box and toasts.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};

use crate::notify::TipLevel;
use crate::theme;

use super::bus::{InputDismissed, InputSubmitted, UiBus};

/// Offset from the cursor so the tip does not sit under it
const CURSOR_OFFSET: egui::Vec2 = egui::vec2(18.0, 18.0);

fn cursor_pos(window_query: &Query<&Window, With<PrimaryWindow>>) -> Option<egui::Pos2> {
    let cursor = window_query.single().ok()?.cursor_position()?;
    Some(egui::pos2(cursor.x, cursor.y) + CURSOR_OFFSET)
}

pub fn float_tip_ui(
    mut contexts: EguiContexts,
    bus: Res<UiBus>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) -> Result {
    // The entry box takes the tip's place while it is open
    if bus.input.is_some() {
        return Ok(());
    }
    let Some(tip) = &bus.float_tip else {
        return Ok(());
    };
    let Some(pos) = cursor_pos(&window_query) else {
        return Ok(());
    };

    let color = match tip.level {
        TipLevel::Info => theme::ui::TIP_TEXT,
        TipLevel::Warning => theme::ui::WARNING_TEXT,
    };
    egui::Area::new(egui::Id::new("snap_float_tip"))
        .fixed_pos(pos)
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(&tip.message).color(color));
            });
        });
    Ok(())
}

pub fn input_box_ui(
    mut contexts: EguiContexts,
    mut bus: ResMut<UiBus>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut submitted: MessageWriter<InputSubmitted>,
    mut dismissed: MessageWriter<InputDismissed>,
) -> Result {
    let Some(pos) = cursor_pos(&window_query) else {
        return Ok(());
    };
    let tip = bus.float_tip.as_ref().map(|t| t.message.clone());
    let Some(input) = bus.input.as_mut() else {
        return Ok(());
    };

    let mut submit = false;
    let mut dismiss = false;

    egui::Area::new(egui::Id::new("snap_input_box"))
        .fixed_pos(pos)
        .show(contexts.ctx_mut()?, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                if let Some(tip) = &tip {
                    ui.label(egui::RichText::new(tip).color(theme::ui::TIP_TEXT));
                }
                let response = ui.add(
                    egui::TextEdit::singleline(&mut input.buffer)
                        .hint_text("x,y,z")
                        .desired_width(160.0)
                        .font(egui::TextStyle::Monospace),
                );

                // Request focus only when not already focused
                if !response.has_focus() {
                    response.request_focus();
                }

                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    dismiss = true;
                }

                ui.label(
                    egui::RichText::new("x,y[,z] relative  #x,y,z absolute  d distance")
                        .small()
                        .color(theme::ui::HINT_TEXT),
                );
            });
        });

    if submit {
        submitted.write(InputSubmitted(input.buffer.clone()));
    } else if dismiss {
        dismissed.write(InputDismissed);
    }
    Ok(())
}

pub fn toasts_ui(mut contexts: EguiContexts, mut bus: ResMut<UiBus>, time: Res<Time>) -> Result {
    bus.tick_toasts(time.delta_secs());
    if bus.toasts.is_empty() {
        return Ok(());
    }

    egui::Area::new(egui::Id::new("snap_toasts"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -48.0])
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            for toast in &bus.toasts {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new(&toast.message).color(theme::ui::ERROR_TEXT));
                });
            }
        });
    Ok(())
}
