//! File picker for choosing the file to upload.
//!
//! This module provides a trait-based abstraction over the native file dialog,
//! enabling mock implementations for testing without relying on system dialogs.
//!
//! # Platform Support
//!
//! - **Native (Windows, macOS, Linux)**: Full support via `rfd` crate using native dialogs.
//! - **Web (WASM)**: Not supported (stub implementation).

use std::path::Path;

use stash_business::SelectedFile;

/// Trait for picking a file, enabling mock implementations for testing.
pub trait FilePicker: Send {
    /// Shows the picker and returns the chosen file, read into memory.
    fn pick(&self) -> Option<SelectedFile>;
}

/// Default file picker using the system file dialog.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct SystemFilePicker;

#[cfg(not(target_arch = "wasm32"))]
impl FilePicker for SystemFilePicker {
    fn pick(&self) -> Option<SelectedFile> {
        let file_path = rfd::FileDialog::new()
            .set_title("Choose a file to upload")
            .pick_file()?;

        log::info!("User selected file: {}", file_path.display());

        match load_file(&file_path) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("Failed to read file {}: {e}", file_path.display());
                None
            }
        }
    }
}

/// Stub file picker for WASM target.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct SystemFilePicker;

#[cfg(target_arch = "wasm32")]
impl FilePicker for SystemFilePicker {
    fn pick(&self) -> Option<SelectedFile> {
        None
    }
}

/// Reads a file from disk and guesses its content type from the extension.
pub fn load_file(path: &Path) -> std::io::Result<SelectedFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let file = SelectedFile::new(name, bytes);
    Ok(match mime_guess::from_path(path).first() {
        Some(mime) => file.with_content_type(mime.essence_str()),
        None => file,
    })
}
