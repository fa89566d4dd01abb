use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

#[derive(Component)]
pub struct ViewportCamera;

/// The camera looks at `focus` from `distance` away along its current back direction.
#[derive(Component)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub distance: f32,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            distance: 36.0,
        }
    }
}

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 400.0;
/// World units panned per pixel of drag, per unit of orbit distance
const PAN_SPEED: f32 = 0.0015;

pub fn spawn_camera(mut commands: Commands) {
    let orbit = CameraOrbit::default();
    let direction = Vec3::new(0.45, 0.7, 0.55).normalize();
    commands.spawn((
        Camera3d::default(),
        ViewportCamera,
        Transform::from_translation(orbit.focus + direction * orbit.distance)
            .looking_at(orbit.focus, Vec3::Y),
        orbit,
    ));
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(&Transform, &mut CameraOrbit), With<ViewportCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((transform, mut orbit)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let scale = orbit.distance * PAN_SPEED;
        let offset = transform.right() * -event.delta.x * scale + transform.up() * event.delta.y * scale;
        orbit.focus += offset;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraOrbit, With<ViewportCamera>>,
) {
    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        orbit.distance = (orbit.distance * (1.0 - scroll_amount)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

pub fn apply_camera_orbit(
    mut camera_query: Query<(&CameraOrbit, &mut Transform), (With<ViewportCamera>, Changed<CameraOrbit>)>,
) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        let back = transform.back();
        transform.translation = orbit.focus + back * orbit.distance;
    }
}
