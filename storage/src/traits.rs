//! Storage trait definitions.

use std::future::Future;

use bytes::Bytes;

use super::types::{FileEntry, ListOptions, StorageError, UploadOptions};

/// Generic interface for a hosted bucket.
///
/// See [crate documentation](crate) for the available implementations.
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// Lists objects in `bucket` whose path starts with `prefix`.
    fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> impl Future<Output = Result<Vec<FileEntry>, StorageError>> + Send;

    /// Stores `content` at `path`. `content` is reference counted, so callers
    /// can keep their copy without duplicating the buffer.
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
        options: &UploadOptions,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Builds the download link for `path`.
    ///
    /// Never touches the network and never fails, even if the object does not exist.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
