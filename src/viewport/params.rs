//! SystemParam bundles for systems that drive pick sessions.
//!
//! - [`ViewportParams`]: window and camera access, builds a [`CameraView`]
//! - [`PickResources`]: the resources a pick session acts on, as a [`PickEnv`]
//!
//! [`is_cursor_over_ui`] gates pointer input behind egui.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::config::SnapSettings;
use crate::pick::PickEnv;
use crate::ui::UiBus;
use crate::view::ViewId;

use super::camera::ViewportCamera;
use super::camera_view::CameraView;
use super::guides::GuideMeshes;
use super::scene::SceneGeometry;

#[derive(SystemParam)]
pub struct ViewportParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (Entity, &'static Camera, &'static GlobalTransform), With<ViewportCamera>>,
}

impl ViewportParams<'_, '_> {
    /// Cursor position in viewport pixels, if the cursor is in the window
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    pub fn view<'a>(&'a self, scene: &'a SceneGeometry, detect_radius: f32) -> Option<CameraView<'a>> {
        let (entity, camera, transform) = self.camera.single().ok()?;
        Some(CameraView::new(
            ViewId(entity.to_bits()),
            camera,
            transform,
            scene,
            detect_radius,
        ))
    }
}

#[derive(SystemParam)]
pub struct PickResources<'w> {
    pub guides: ResMut<'w, GuideMeshes>,
    pub bus: ResMut<'w, UiBus>,
    pub settings: ResMut<'w, SnapSettings>,
    pub time: Res<'w, Time>,
}

impl PickResources<'_> {
    pub fn env(&mut self) -> PickEnv<'_> {
        PickEnv {
            visual: &mut *self.guides,
            bus: &mut *self.bus,
            settings: &mut *self.settings,
            now: self.time.elapsed(),
        }
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Check if egui has keyboard focus (a text field is active)
pub fn is_typing(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false)
}
