//! State published by the [`FileController`](crate::FileController).

use bytes::Bytes;
use stash_storage::FileEntry;

/// A file picked by the user, held in memory until it is uploaded.
///
/// `bytes` is shared, so every published snapshot points at the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Status of the upload trigger and the message shown next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Success(String),
    Error(String),
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(message) | Self::Error(message) => Some(message.as_str()),
            Self::Idle | Self::Uploading => None,
        }
    }

    /// Drops a finished operation's message. An in-flight upload is left alone.
    pub(crate) fn clear_message(&mut self) {
        if matches!(self, Self::Success(_) | Self::Error(_)) {
            *self = Self::Idle;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    /// Result of the last successful listing.
    pub entries: Vec<FileEntry>,
    pub loading: bool,
}

/// Everything the UI renders, published as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub selected: Option<SelectedFile>,
    pub upload: UploadState,
    pub listing: ListingState,
}

impl ControllerState {
    /// The upload trigger is disabled while an upload is in flight.
    pub fn upload_enabled(&self) -> bool {
        !self.upload.is_uploading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_message_keeps_uploading() {
        let mut state = UploadState::Uploading;
        state.clear_message();
        assert_eq!(state, UploadState::Uploading);

        let mut state = UploadState::Error("boom".to_owned());
        state.clear_message();
        assert_eq!(state, UploadState::Idle);

        let mut state = UploadState::Success("done".to_owned());
        state.clear_message();
        assert_eq!(state, UploadState::Idle);
    }

    #[test]
    fn message_only_for_finished_states() {
        assert_eq!(UploadState::Idle.message(), None);
        assert_eq!(UploadState::Uploading.message(), None);
        assert_eq!(UploadState::Error("e".to_owned()).message(), Some("e"));
    }

    #[test]
    fn trigger_disabled_only_while_uploading() {
        let mut state = ControllerState::default();
        assert!(state.upload_enabled());
        state.upload = UploadState::Uploading;
        assert!(!state.upload_enabled());
        state.upload = UploadState::Error("e".to_owned());
        assert!(state.upload_enabled());
    }
}
