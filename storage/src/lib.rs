//! Object storage used by the stash front-end.
//!
//! The [`ObjectStore`] trait is the only way the rest of the workspace talks
//! to a bucket. [`RestObjectStore`] speaks the hosted storage REST API and
//! [`MockObjectStore`] keeps everything in memory.

mod mock;
mod rest;
mod traits;
mod types;

pub use mock::MockObjectStore;
pub use rest::RestObjectStore;
pub use traits::ObjectStore;
pub use types::{
    FileEntry, ListOptions, SortBy, SortColumn, SortOrder, StorageError, UploadOptions,
};
