mod bus;
mod prompt;
mod settings_dialog;
mod status_bar;

pub use bus::{FloatTip, InputBox, InputDismissed, InputSubmitted, Toast, UiBus};
pub use settings_dialog::{apply_draft, SettingsDialogState};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiBus>()
            .init_resource::<SettingsDialogState>()
            .add_message::<InputSubmitted>()
            .add_message::<InputDismissed>()
            // Panels first so floating areas are placed over them
            .add_systems(EguiPrimaryContextPass, status_bar::status_bar_ui)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    prompt::float_tip_ui,
                    prompt::input_box_ui,
                    prompt::toasts_ui,
                    settings_dialog::settings_dialog_ui,
                    status_bar::config_reset_notification_ui,
                )
                    .after(status_bar::status_bar_ui),
            );
    }
}
