#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{Context as _, anyhow};
use stash_business::{FileController, StashConfig, StorageBackend};
use stash_ui::StashApp;
use stash_ui::utils::file_picker::SystemFilePicker;

#[cfg(not(target_arch = "wasm32"))]
mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default()).init();

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {e}");
    }
    let config = StashConfig::init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("stash-worker")
        .build()
        .context("Failed to start the async runtime")?;

    let backend = StorageBackend::from_config(&config);
    let controller = FileController::new(backend, &config);

    let native_options = eframe::NativeOptions {
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 560.0])
            .with_min_inner_size([320.0, 360.0]),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "Stash",
        native_options,
        Box::new(move |cc| {
            let app = StashApp::new(controller, handle, Box::new(SystemFilePicker));
            app.repaint_on_change(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("Failed to run the UI: {e}"))
}
