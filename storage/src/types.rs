//! Object storage types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata for one stored object, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub content_type: Option<String>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            updated_at: None,
            size: None,
            content_type: None,
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    UpdatedAt,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortBy {
    pub column: SortColumn,
    pub order: SortOrder,
}

/// Paging and ordering of a listing.
///
/// The default asks for the first 100 objects by name, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
}

impl ListOptions {
    pub const DEFAULT_LIMIT: u32 = 100;
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortBy::default(),
        }
    }
}

/// Options sent along with an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Cache lifetime in seconds, sent as `max-age`.
    pub cache_control: String,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
    pub content_type: Option<String>,
}

impl UploadOptions {
    pub const DEFAULT_CACHE_CONTROL: &'static str = "3600";

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: Self::DEFAULT_CACHE_CONTROL.to_owned(),
            upsert: false,
            content_type: None,
        }
    }
}

/// Error type for object storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The service answered with an explicit error.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    /// True for failures the service itself did not report.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::InvalidConfig(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
