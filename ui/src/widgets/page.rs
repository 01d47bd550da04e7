use egui::Ui;
use stash_business::ControllerState;

use super::{file_list, status_message, upload_form};

/// What the user asked for while the page was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    ChooseFile,
    Upload,
    Refresh,
}

/// The whole front page: upload form, status line and file list.
pub fn files_page(
    ui: &mut Ui,
    state: &ControllerState,
    url_for: &dyn Fn(&str) -> String,
) -> Option<PageAction> {
    ui.heading("Cloud Storage");
    ui.label("Upload files to the bucket and open them from the list below.");
    ui.separator();

    let mut action = upload_form(ui, state);
    status_message(ui, &state.upload);

    ui.separator();
    if file_list(ui, &state.listing, url_for) {
        action = Some(PageAction::Refresh);
    }

    action
}
