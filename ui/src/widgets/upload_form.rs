use egui::{Button, Ui};
use stash_business::ControllerState;

use super::PageAction;

pub const CHOOSE_FILE_LABEL: &str = "Choose file…";
pub const UPLOAD_LABEL: &str = "Upload file";
pub const UPLOADING_LABEL: &str = "Uploading...";

/// File chooser plus the upload trigger, disabled while an upload is in flight.
pub fn upload_form(ui: &mut Ui, state: &ControllerState) -> Option<PageAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label("Choose a file to upload:");
        if ui.button(CHOOSE_FILE_LABEL).clicked() {
            action = Some(PageAction::ChooseFile);
        }
        match &state.selected {
            Some(file) => ui.label(file.name.as_str()),
            None => ui.weak("No file chosen"),
        };
    });

    let enabled = state.upload_enabled();
    let label = if enabled { UPLOAD_LABEL } else { UPLOADING_LABEL };
    if ui.add_enabled(enabled, Button::new(label)).clicked() {
        action = Some(PageAction::Upload);
    }

    action
}
