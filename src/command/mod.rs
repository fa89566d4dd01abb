//! Commands that drive pick sessions from Bevy input.

mod polyline;

pub use polyline::PolylineCommand;

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::pick::{PickKey, PickState, PointerButton};
use crate::ui::{InputDismissed, InputSubmitted};
use crate::viewport::{is_cursor_over_ui, is_typing, PickResources, SceneGeometry, ViewportParams};

/// Translate a logical key into the keys a pick session understands.
pub fn pick_key(key: &Key) -> Option<PickKey> {
    match key {
        Key::Escape => Some(PickKey::Escape),
        Key::Enter => Some(PickKey::Enter),
        Key::Character(text) => text.chars().next().map(PickKey::Char),
        _ => None,
    }
}

fn start_polyline(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut command: ResMut<PolylineCommand>,
    mut pick: PickResources,
) {
    // Don't start commands while typing in a text field
    if is_typing(&mut contexts) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyL) && !command.is_active() {
        info!("Polyline command started");
        command.begin(&mut pick.env());
    }
}

#[allow(clippy::too_many_arguments)]
fn drive_pick_session(
    mut command: ResMut<PolylineCommand>,
    mut pick: PickResources,
    viewport: ViewportParams,
    mut scene: ResMut<SceneGeometry>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut keys: MessageReader<KeyboardInput>,
    mut submitted: MessageReader<InputSubmitted>,
    mut dismissed: MessageReader<InputDismissed>,
    mut contexts: EguiContexts,
) {
    if !command.is_active() {
        keys.clear();
        submitted.clear();
        dismissed.clear();
        return;
    }

    let typing = is_typing(&mut contexts);
    let over_ui = is_cursor_over_ui(&mut contexts);
    let detect_radius = pick.settings.config().snap_distance;

    let finished = {
        let Some(view) = viewport.view(&scene, detect_radius) else {
            return;
        };
        let mut env = pick.env();
        let Some(session) = command.session_mut() else {
            return;
        };

        session.update(&mut env);

        if !over_ui && let Some(cursor) = viewport.cursor_position() {
            session.pointer_move(&view, cursor.x, cursor.y, &mut env);
            if mouse_button.just_released(MouseButton::Left) {
                session.pointer_up(&view, cursor.x, cursor.y, PointerButton::Primary, &mut env);
            }
        }

        // The entry box owns the keyboard while it is open
        if typing || session.state() == PickState::Inputting {
            keys.clear();
        } else {
            for event in keys.read() {
                if event.state == ButtonState::Pressed
                    && let Some(key) = pick_key(&event.logical_key)
                {
                    session.key_down(key, &mut env);
                }
            }
        }

        for InputSubmitted(text) in submitted.read() {
            // Rejections are already reported as toasts
            let _ = session.submit_input(&view, text, &mut env);
        }
        for _ in dismissed.read() {
            session.dismiss_input(&mut env);
        }

        command.advance(&mut env)
    };

    if let Some(points) = finished {
        let name = scene.next_name("Polyline");
        info!("{} added with {} points", name, points.len());
        scene.add_polyline(name, &points);
    }
}

pub struct CommandPlugin;

impl Plugin for CommandPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PolylineCommand>().add_systems(
            Update,
            (start_polyline, drive_pick_session).chain(),
        );
    }
}
