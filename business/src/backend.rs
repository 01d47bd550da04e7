use bytes::Bytes;
use log::info;
use stash_storage::{
    FileEntry, ListOptions, MockObjectStore, ObjectStore, RestObjectStore, StorageError,
    UploadOptions,
};

use crate::StashConfig;

/// Storage picked at startup from [`StashConfig`].
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Rest(RestObjectStore),
    Memory(MockObjectStore),
}

impl StorageBackend {
    /// REST storage when `STORAGE_URL` is configured, in-memory storage otherwise.
    pub fn from_config(config: &StashConfig) -> Self {
        match config.storage_url() {
            Some(url) => {
                info!("Storage backend: REST ({url})");
                let store = RestObjectStore::new(url);
                Self::Rest(match config.storage_api_key() {
                    Some(key) => store.with_api_key(key),
                    None => store,
                })
            }
            None => {
                info!("Storage backend: in-memory");
                Self::Memory(MockObjectStore::new())
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Rest(_))
    }
}

impl ObjectStore for StorageBackend {
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileEntry>, StorageError> {
        match self {
            Self::Rest(store) => store.list(bucket, prefix, options).await,
            Self::Memory(store) => store.list(bucket, prefix, options).await,
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        match self {
            Self::Rest(store) => store.upload(bucket, path, content, options).await,
            Self::Memory(store) => store.upload(bucket, path, content, options).await,
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match self {
            Self::Rest(store) => store.public_url(bucket, path),
            Self::Memory(store) => store.public_url(bucket, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_without_url() {
        let backend = StorageBackend::from_config(&StashConfig::default());
        assert!(!backend.is_remote());
        assert_eq!(backend.public_url("files", "a.txt"), "memory://files/a.txt");
    }

    #[test]
    fn rest_backend_with_url() {
        let config = StashConfig::default()
            .with_storage_url("https://demo.storage.test")
            .with_api_key("anon-key");
        let backend = StorageBackend::from_config(&config);
        assert!(backend.is_remote());
        assert_eq!(
            backend.public_url("files", "a.txt"),
            "https://demo.storage.test/storage/v1/object/public/files/a.txt"
        );
    }
}
