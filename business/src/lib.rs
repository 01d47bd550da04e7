mod backend;
mod config;
mod controller;
mod path;
mod state;

pub use backend::StorageBackend;
pub use config::StashConfig;
pub use controller::{FileController, messages};
pub use path::{Clock, FixedClock, SystemClock, object_path, sanitize_file_name};
pub use state::{ControllerState, ListingState, SelectedFile, UploadState};
