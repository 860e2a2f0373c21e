//! SQLite-backed page store.
//!
//! Uses SqlitePoolManager; `(owner, url)` uniqueness is enforced by the table and `INSERT OR IGNORE`.
//! Insertion order is the autoincrement id.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::page::Page;
use crate::repository::PageStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqlitePageStore {
    pool_manager: SqlitePoolManager,
}

impl SqlitePageStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating pages table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                url TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                UNIQUE(owner, url)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pages_owner ON pages(owner)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PageStore for SqlitePageStore {
    async fn save(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO pages (owner, url, is_read, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(owner)
        .bind(url)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(owner = %owner, url = %url, inserted = result.rows_affected(), "save page");
        Ok(())
    }

    async fn exists(&self, owner: &str, url: &str) -> Result<bool, StorageError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pages WHERE owner = ? AND url = ?")
            .bind(owner)
            .bind(url)
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count.0 > 0)
    }

    async fn mark_read(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE pages SET is_read = 1 WHERE owner = ? AND url = ?")
            .bind(owner)
            .bind(url)
            .execute(self.pool_manager.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("page {} for user {}", url, owner)));
        }
        Ok(())
    }

    async fn remove(&self, owner: &str, url: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM pages WHERE owner = ? AND url = ?")
            .bind(owner)
            .bind(url)
            .execute(self.pool_manager.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("page {} for user {}", url, owner)));
        }
        Ok(())
    }

    async fn random_unread(&self, owner: &str) -> Result<Page, StorageError> {
        sqlx::query_as::<_, Page>(
            "SELECT url, owner, is_read, created_at FROM pages \
             WHERE owner = ? AND is_read = 0 ORDER BY RANDOM() LIMIT 1",
        )
        .bind(owner)
        .fetch_optional(self.pool_manager.pool())
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("no unread pages for {}", owner)))
    }

    async fn list(&self, owner: &str) -> Result<Vec<Page>, StorageError> {
        let pages = sqlx::query_as::<_, Page>(
            "SELECT url, owner, is_read, created_at FROM pages WHERE owner = ? ORDER BY id",
        )
        .bind(owner)
        .fetch_all(self.pool_manager.pool())
        .await?;

        if pages.is_empty() {
            return Err(StorageError::NotFound(format!("no pages saved by {}", owner)));
        }
        Ok(pages)
    }
}
