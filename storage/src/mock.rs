//! In-memory object store for tests and offline runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use chrono::Utc;

use super::traits::ObjectStore;
use super::types::{FileEntry, ListOptions, SortColumn, SortOrder, StorageError, UploadOptions};

/// In-memory implementation of [`ObjectStore`].
///
/// Failures can be injected per operation and calls are counted, so callers
/// can assert on exactly what reached the store.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    inner: Arc<RwLock<MockInner>>,
}

impl std::fmt::Debug for MockObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockObjectStore").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct MockInner {
    buckets: HashMap<String, BTreeMap<String, MockObject>>,
    list_failure: Option<StorageError>,
    upload_failure: Option<StorageError>,
    list_calls: usize,
    upload_calls: usize,
    last_upload: Option<(String, UploadOptions)>,
}

#[derive(Clone)]
struct MockObject {
    content: Bytes,
    entry: FileEntry,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object without counting it as an upload.
    pub fn insert(&self, bucket: &str, entry: FileEntry, content: impl Into<Bytes>) {
        let content = content.into();
        let mut inner = self.inner.write().expect("lock poisoned");
        inner
            .buckets
            .entry(bucket.to_owned())
            .or_default()
            .insert(entry.name.clone(), MockObject { content, entry });
    }

    pub fn content(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(path))
            .map(|object| object.content.to_vec())
    }

    pub fn len(&self, bucket: &str) -> usize {
        let inner = self.inner.read().expect("lock poisoned");
        inner.buckets.get(bucket).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, bucket: &str) -> bool {
        self.len(bucket) == 0
    }

    /// Every following `list` fails with `err` until [`Self::recover`].
    pub fn fail_lists(&self, err: StorageError) {
        self.inner.write().expect("lock poisoned").list_failure = Some(err);
    }

    /// Every following `upload` fails with `err` until [`Self::recover`].
    pub fn fail_uploads(&self, err: StorageError) {
        self.inner.write().expect("lock poisoned").upload_failure = Some(err);
    }

    pub fn recover(&self) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.list_failure = None;
        inner.upload_failure = None;
    }

    pub fn list_calls(&self) -> usize {
        self.inner.read().expect("lock poisoned").list_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.inner.read().expect("lock poisoned").upload_calls
    }

    /// Path and options of the most recent upload attempt.
    pub fn last_upload(&self) -> Option<(String, UploadOptions)> {
        self.inner.read().expect("lock poisoned").last_upload.clone()
    }
}

impl ObjectStore for MockObjectStore {
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileEntry>, StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.list_calls += 1;
        if let Some(err) = &inner.list_failure {
            return Err(err.clone());
        }

        let mut entries: Vec<FileEntry> = inner
            .buckets
            .get(bucket)
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter(|object| object.entry.name.starts_with(prefix))
            .map(|object| object.entry.clone())
            .collect();

        match options.sort_by.column {
            SortColumn::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
            SortColumn::UpdatedAt | SortColumn::CreatedAt => {
                entries.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
            }
        }
        if options.sort_by.order == SortOrder::Desc {
            entries.reverse();
        }

        Ok(entries
            .into_iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .collect())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.upload_calls += 1;
        inner.last_upload = Some((path.to_owned(), options.clone()));
        if let Some(err) = &inner.upload_failure {
            return Err(err.clone());
        }

        let objects = inner.buckets.entry(bucket.to_owned()).or_default();
        if !options.upsert && objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_owned()));
        }

        let mut entry = FileEntry::new(path)
            .with_updated_at(Utc::now())
            .with_size(content.len() as u64);
        entry.content_type.clone_from(&options.content_type);
        objects.insert(path.to_owned(), MockObject { content, entry });
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_list() {
        let storage = MockObjectStore::new();
        storage
            .upload("files", "b.txt", Bytes::from_static(b"b"), &UploadOptions::default())
            .await
            .unwrap();
        storage
            .upload("files", "a.txt", Bytes::from_static(b"a"), &UploadOptions::default())
            .await
            .unwrap();

        let names: Vec<String> = storage
            .list("files", "", &ListOptions::default())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(storage.content("files", "a.txt"), Some(b"a".to_vec()));
        assert_eq!(storage.upload_calls(), 2);
        assert_eq!(storage.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_empty_bucket() {
        let storage = MockObjectStore::new();
        let entries = storage
            .list("files", "", &ListOptions::default())
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let storage = MockObjectStore::new();
        storage.insert("other", FileEntry::new("x.txt"), b"x".to_vec());
        assert!(storage.is_empty("files"));
        assert_eq!(storage.len("other"), 1);
    }

    #[tokio::test]
    async fn test_upload_without_upsert_rejects_duplicates() {
        let storage = MockObjectStore::new();
        storage.insert("files", FileEntry::new("a.txt"), b"old".to_vec());

        let result = storage
            .upload("files", "a.txt", Bytes::from_static(b"new"), &UploadOptions::default())
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(storage.content("files", "a.txt"), Some(b"old".to_vec()));

        let upsert = UploadOptions {
            upsert: true,
            ..UploadOptions::default()
        };
        storage
            .upload("files", "a.txt", Bytes::from_static(b"new"), &upsert)
            .await
            .unwrap();
        assert_eq!(storage.content("files", "a.txt"), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_list_paging_and_order() {
        let storage = MockObjectStore::new();
        for name in ["c", "a", "d", "b"] {
            storage.insert("files", FileEntry::new(name), Bytes::new());
        }

        let options = ListOptions {
            limit: 2,
            offset: 1,
            sort_by: crate::SortBy {
                column: SortColumn::Name,
                order: SortOrder::Desc,
            },
        };
        let names: Vec<String> = storage
            .list("files", "", &options)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_injected_failures_until_recover() {
        let storage = MockObjectStore::new();
        storage.fail_lists(StorageError::Transport("offline".to_owned()));
        storage.fail_uploads(StorageError::Api {
            status: 413,
            message: "quota exceeded".to_owned(),
        });

        assert!(
            storage
                .list("files", "", &ListOptions::default())
                .await
                .is_err()
        );
        assert!(
            storage
                .upload("files", "a", Bytes::new(), &UploadOptions::default())
                .await
                .is_err()
        );
        assert!(storage.is_empty("files"));

        storage.recover();
        storage
            .upload("files", "a", Bytes::new(), &UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(storage.len("files"), 1);
        assert_eq!(storage.upload_calls(), 2);
    }
}
