//! Upload / list state machine.
//!
//! [`FileController`] runs the two operations the front-end offers against an
//! [`ObjectStore`] and publishes every state change through a [`Store`]:
//!
//! - [`FileController::refresh_listing`] replaces the listing with a fresh fetch.
//! - [`FileController::upload`] uploads the selected file and, on success,
//!   refreshes the listing.
//!
//! Each transition is one [`Store::update`], so subscribers never observe a
//! half-applied change.

use std::sync::Arc;

use log::{error, info, warn};
use stash_states::{Store, Subscription};
use stash_storage::{ListOptions, ObjectStore, StorageError, UploadOptions};

use crate::path::{Clock, SystemClock, object_path};
use crate::state::{ControllerState, SelectedFile, UploadState};
use crate::StashConfig;

/// User-facing status text.
pub mod messages {
    pub const NO_FILE_SELECTED: &str = "No file selected. Please choose a file first.";
    pub const UPLOAD_SUCCEEDED: &str = "File uploaded successfully.";
    pub const UPLOAD_FAILED: &str = "Upload failed";
    pub const UPLOAD_UNEXPECTED: &str = "Unexpected error during upload";
    pub const LIST_FAILED: &str = "Could not load the file list";
}

pub struct FileController<S: ObjectStore> {
    storage: S,
    bucket: Arc<str>,
    clock: Arc<dyn Clock>,
    store: Store<ControllerState>,
}

impl<S: ObjectStore> Clone for FileController<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            bucket: Arc::clone(&self.bucket),
            clock: Arc::clone(&self.clock),
            store: self.store.clone(),
        }
    }
}

impl<S: ObjectStore> FileController<S> {
    pub fn new(storage: S, config: &StashConfig) -> Self {
        Self::with_clock(storage, config, SystemClock)
    }

    pub fn with_clock(storage: S, config: &StashConfig, clock: impl Clock + 'static) -> Self {
        Self {
            storage,
            bucket: Arc::from(config.bucket()),
            clock: Arc::new(clock),
            store: Store::default(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn snapshot(&self) -> ControllerState {
        self.store.get()
    }

    /// Yields the current state first, then every change.
    pub fn subscribe(&self) -> Subscription<ControllerState> {
        self.store.subscribe()
    }

    pub fn upload_enabled(&self) -> bool {
        self.store.read(ControllerState::upload_enabled)
    }

    pub fn select_file(&self, file: Option<SelectedFile>) {
        if let Some(file) = &file {
            info!("Selected {} ({} bytes)", file.name, file.bytes.len());
        }
        self.store.update(|s| s.selected = file);
    }

    /// Download link for `name` in the configured bucket.
    pub fn public_url(&self, name: &str) -> String {
        self.storage.public_url(&self.bucket, name)
    }

    /// Fetches the first page of the bucket and replaces the listing.
    ///
    /// On failure the previous entries stay in place and the status becomes
    /// [`UploadState::Error`]. `loading` is always false again afterwards.
    pub async fn refresh_listing(&self) {
        self.fetch_listing(true).await;
    }

    /// Uploads the selected file under a timestamped path.
    ///
    /// On success the selection is cleared and the listing refreshed; a
    /// failing refresh then replaces the success message with its own error.
    /// On failure the selection is kept so the user can retry.
    pub async fn upload(&self) {
        let Some(file) = self.store.read(|s| s.selected.clone()) else {
            warn!("Upload requested with no file selected");
            self.store.update(|s| {
                s.upload = UploadState::Error(messages::NO_FILE_SELECTED.to_owned());
            });
            return;
        };

        let path = object_path(self.clock.now_millis(), &file.name);
        let options = UploadOptions::default().with_content_type(file.content_type);
        let _uploading = UploadingGuard::engage(&self.store);

        info!("Uploading {} as {}/{path}", file.name, self.bucket);
        match self
            .storage
            .upload(&self.bucket, &path, file.bytes, &options)
            .await
        {
            Ok(()) => {
                info!("Uploaded {}/{path}", self.bucket);
                self.store.update(|s| {
                    s.upload = UploadState::Success(messages::UPLOAD_SUCCEEDED.to_owned());
                    s.selected = None;
                });
                self.fetch_listing(false).await;
            }
            Err(err) => {
                error!("Upload of {path} failed: {err}");
                let message = upload_error_message(&err);
                self.store.update(|s| s.upload = UploadState::Error(message));
            }
        }
    }

    async fn fetch_listing(&self, clear_message: bool) {
        self.store.update(|s| {
            s.listing.loading = true;
            if clear_message {
                s.upload.clear_message();
            }
        });

        match self
            .storage
            .list(&self.bucket, "", &ListOptions::default())
            .await
        {
            Ok(entries) => {
                info!("Listed {} objects in {}", entries.len(), self.bucket);
                self.store.update(|s| {
                    s.listing.entries = entries;
                    s.listing.loading = false;
                });
            }
            Err(err) => {
                error!("Listing {} failed: {err}", self.bucket);
                let message = format!("{}: {err}", messages::LIST_FAILED);
                let mut superseded = false;
                self.store.update(|s| {
                    s.listing.loading = false;
                    // An upload in flight will publish its own outcome.
                    if s.upload.is_uploading() {
                        superseded = true;
                    } else {
                        s.upload = UploadState::Error(message);
                    }
                });
                if superseded {
                    warn!(
                        "Listing error for {} not shown, superseded by the upload in flight: {err}",
                        self.bucket
                    );
                }
            }
        }
    }
}

fn upload_error_message(err: &StorageError) -> String {
    if err.is_unexpected() {
        format!("{}: {err}", messages::UPLOAD_UNEXPECTED)
    } else {
        format!("{}: {err}", messages::UPLOAD_FAILED)
    }
}

/// Holds [`UploadState::Uploading`] for the lifetime of an upload.
///
/// If the upload future is dropped or panics before publishing an outcome,
/// dropping the guard still moves the state out of `Uploading`.
struct UploadingGuard<'a> {
    store: &'a Store<ControllerState>,
}

impl<'a> UploadingGuard<'a> {
    fn engage(store: &'a Store<ControllerState>) -> Self {
        store.update(|s| s.upload = UploadState::Uploading);
        Self { store }
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        if !self.store.read(|s| s.upload.is_uploading()) {
            return;
        }
        let panicking = std::thread::panicking();
        self.store.update(|s| {
            if !s.upload.is_uploading() {
                return;
            }
            s.upload = if panicking {
                UploadState::Error(messages::UPLOAD_UNEXPECTED.to_owned())
            } else {
                UploadState::Idle
            };
        });
    }
}
