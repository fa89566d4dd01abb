//! The 3D viewport hosting the snapping engine.
//!
//! ## Module Structure
//!
//! - [`camera`] - Camera spawn, pan and zoom
//! - [`scene`] - Named edge/vertex geometry offered to snapping
//! - [`camera_view`] - The view contract over the camera and scene
//! - [`guides`] - Snap feedback drawn with gizmos
//! - [`params`] - SystemParam bundles for pick-driving systems

mod camera;
pub mod camera_view;
pub mod guides;
pub mod params;
pub mod scene;

pub use camera::{CameraOrbit, ViewportCamera};
pub use camera_view::CameraView;
pub use guides::{GuideGizmoGroup, GuideMeshes};
pub use params::{is_cursor_over_ui, is_typing, PickResources, ViewportParams};
pub use scene::{SceneGeometry, SceneObject};

use bevy::prelude::*;

use crate::config::SnapSettings;
use crate::theme;

/// Half-extent of the drawn ground grid, in grid cells
const GRID_HALF_CELLS: i32 = 40;

/// Ground grid around the camera focus, only while grid snapping is on.
fn draw_grid(
    mut gizmos: Gizmos,
    settings: Res<SnapSettings>,
    camera_query: Query<&CameraOrbit, With<ViewportCamera>>,
) {
    let config = settings.config();
    if !config.enable_grid || config.grid_spacing <= 0.0 {
        return;
    }

    let Ok(orbit) = camera_query.single() else {
        return;
    };

    let grid_size = config.grid_spacing;
    let center_x = (orbit.focus.x / grid_size).round() as i32;
    let center_z = (orbit.focus.z / grid_size).round() as i32;
    let (start_x, end_x) = (center_x - GRID_HALF_CELLS, center_x + GRID_HALF_CELLS);
    let (start_z, end_z) = (center_z - GRID_HALF_CELLS, center_z + GRID_HALF_CELLS);

    for x in start_x..=end_x {
        let x_pos = x as f32 * grid_size;
        gizmos.line(
            Vec3::new(x_pos, 0.0, start_z as f32 * grid_size),
            Vec3::new(x_pos, 0.0, end_z as f32 * grid_size),
            theme::GRID_COLOR,
        );
    }

    for z in start_z..=end_z {
        let z_pos = z as f32 * grid_size;
        gizmos.line(
            Vec3::new(start_x as f32 * grid_size, 0.0, z_pos),
            Vec3::new(end_x as f32 * grid_size, 0.0, z_pos),
            theme::GRID_COLOR,
        );
    }
}

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneGeometry>()
            .init_resource::<GuideMeshes>()
            .init_gizmo_group::<GuideGizmoGroup>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    scene::spawn_demo_scene,
                    guides::configure_guide_gizmos,
                ),
            )
            .add_systems(
                Update,
                (
                    (
                        camera::camera_pan,
                        camera::camera_zoom,
                        camera::apply_camera_orbit,
                    )
                        .chain(),
                    draw_grid,
                    scene::draw_scene,
                    guides::draw_guides,
                ),
            );
    }
}
