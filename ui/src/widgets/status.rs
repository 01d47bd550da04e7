use crate::utils::colors::{COLOR_GREEN, COLOR_RED};
use egui::Ui;
use stash_business::UploadState;

/// Shows the outcome of the last operation, if there is one.
pub fn status_message(ui: &mut Ui, upload: &UploadState) {
    match upload {
        UploadState::Idle | UploadState::Uploading => {}
        UploadState::Success(message) => {
            ui.colored_label(COLOR_GREEN, message.as_str());
        }
        UploadState::Error(message) => {
            ui.colored_label(COLOR_RED, message.as_str());
        }
    }
}
