//! Storage abstraction the editor reads and writes through.

pub mod local;

use async_trait::async_trait;

use crate::error::StorageError;

pub use local::{LocalView, PathLock};

/// Path-scoped access to the file store.
///
/// Paths are virtual, rooted at the store's top level (`/notes/todo.txt`).
/// Every operation may fail with any [`StorageError`] kind; callers decide how
/// each kind is reported.
#[async_trait]
pub trait View: Send + Sync {
    /// Size of the file in bytes.
    async fn size(&self, path: &str) -> Result<u64, StorageError>;

    /// Full contents of the file.
    ///
    /// `Ok(None)` means the file could not be read. An empty string is a
    /// successful read of an empty file.
    async fn read(&self, path: &str) -> Result<Option<String>, StorageError>;

    /// Replace the file's contents.
    async fn write(&self, path: &str, contents: &str) -> Result<(), StorageError>;

    /// Last modification time, in unix seconds.
    async fn modified_time(&self, path: &str) -> Result<i64, StorageError>;

    /// Whether the current user may write to the path.
    async fn is_updatable(&self, path: &str) -> Result<bool, StorageError>;

    async fn mime_type(&self, path: &str) -> Result<String, StorageError>;
}
