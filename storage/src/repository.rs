use async_trait::async_trait;

use crate::error::StorageError;
use crate::page::Page;

/// Per-owner collection of saved pages. Every method is safe to call concurrently.
///
/// `(owner, url)` is unique: saving a duplicate is a no-op, never an error.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Inserts the page unless the owner already saved this url.
    async fn save(&self, owner: &str, url: &str) -> Result<(), StorageError>;
    async fn exists(&self, owner: &str, url: &str) -> Result<bool, StorageError>;
    /// `NotFound` when the owner has no such url.
    async fn mark_read(&self, owner: &str, url: &str) -> Result<(), StorageError>;
    /// `NotFound` when the owner has no such url.
    async fn remove(&self, owner: &str, url: &str) -> Result<(), StorageError>;
    /// Uniform pick among the owner's unread pages; `NotFound` when there are none.
    async fn random_unread(&self, owner: &str) -> Result<Page, StorageError>;
    /// Pages in insertion order; `NotFound` when the owner has none.
    async fn list(&self, owner: &str) -> Result<Vec<Page>, StorageError>;
}
