use egui::{ScrollArea, Ui};
use stash_business::ListingState;

use crate::utils::format::{format_size, format_timestamp};

pub const REFRESH_LABEL: &str = "Refresh";
pub const LOADING_LABEL: &str = "Loading file list...";
pub const EMPTY_LABEL: &str = "No files yet.";
pub const DOWNLOAD_LABEL: &str = "Open / Download";

/// Renders the listing. Returns true when the user asked for a refresh.
pub fn file_list(ui: &mut Ui, listing: &ListingState, url_for: &dyn Fn(&str) -> String) -> bool {
    let mut refresh = false;

    ui.horizontal(|ui| {
        ui.heading("Uploaded files");
        if ui
            .add_enabled(!listing.loading, egui::Button::new(REFRESH_LABEL))
            .clicked()
        {
            refresh = true;
        }
    });

    if listing.loading {
        ui.label(LOADING_LABEL);
        return refresh;
    }

    if listing.entries.is_empty() {
        ui.weak(EMPTY_LABEL);
        return refresh;
    }

    ScrollArea::vertical().show(ui, |ui| {
        for entry in &listing.entries {
            ui.horizontal(|ui| {
                ui.label(entry.name.as_str());
                if let Some(updated_at) = &entry.updated_at {
                    ui.weak(format_timestamp(updated_at));
                }
                if let Some(size) = entry.size {
                    ui.weak(format_size(size));
                }
                ui.hyperlink_to(DOWNLOAD_LABEL, url_for(&entry.name));
            });
        }
    });

    refresh
}
