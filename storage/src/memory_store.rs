//! In-memory page store.
//!
//! A single `RwLock` guards the whole collection: mutations take the write lock, queries the read lock.
//! Nothing awaits while a guard is held except the lock acquisition itself. Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::page::Page;
use crate::repository::PageStore;

/// Pages keyed by owner, each owner's list kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    pages: Arc<RwLock<HashMap<String, Vec<Page>>>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pages across all owners.
    pub async fn len(&self) -> usize {
        let pages = self.pages.read().await;
        pages.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(owner: &str, url: &str) -> StorageError {
    StorageError::NotFound(format!("page {} for user {}", url, owner))
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn save(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let mut pages = self.pages.write().await;
        let list = pages.entry(owner.to_string()).or_default();
        if list.iter().any(|p| p.url == url) {
            debug!(owner = %owner, url = %url, "page already saved, skipping");
            return Ok(());
        }
        list.push(Page::new(owner, url));
        Ok(())
    }

    async fn exists(&self, owner: &str, url: &str) -> Result<bool, StorageError> {
        let pages = self.pages.read().await;
        Ok(pages
            .get(owner)
            .is_some_and(|list| list.iter().any(|p| p.url == url)))
    }

    async fn mark_read(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let mut pages = self.pages.write().await;
        let page = pages
            .get_mut(owner)
            .and_then(|list| list.iter_mut().find(|p| p.url == url))
            .ok_or_else(|| not_found(owner, url))?;
        page.read = true;
        Ok(())
    }

    async fn remove(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let mut pages = self.pages.write().await;
        let list = pages.get_mut(owner).ok_or_else(|| not_found(owner, url))?;
        let idx = list
            .iter()
            .position(|p| p.url == url)
            .ok_or_else(|| not_found(owner, url))?;
        list.remove(idx);
        if list.is_empty() {
            pages.remove(owner);
        }
        Ok(())
    }

    async fn random_unread(&self, owner: &str) -> Result<Page, StorageError> {
        let pages = self.pages.read().await;
        let Some(list) = pages.get(owner) else {
            return Err(StorageError::NotFound(format!("no pages saved by {}", owner)));
        };
        let unread: Vec<&Page> = list.iter().filter(|p| !p.read).collect();
        unread
            .choose(&mut rand::rng())
            .map(|p| (*p).clone())
            .ok_or_else(|| StorageError::NotFound(format!("no unread pages for {}", owner)))
    }

    async fn list(&self, owner: &str) -> Result<Vec<Page>, StorageError> {
        let pages = self.pages.read().await;
        match pages.get(owner) {
            Some(list) if !list.is_empty() => Ok(list.clone()),
            _ => Err(StorageError::NotFound(format!("no pages saved by {}", owner))),
        }
    }
}
