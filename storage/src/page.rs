//! Page model: one link a user asked to remember.
//!
//! Maps to the `pages` table for SqlitePageStore and is held directly by MemoryPageStore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    pub url: String,
    pub owner: String,
    #[sqlx(rename = "is_read")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Page {
    /// Creates an unread page stamped with the current time.
    pub fn new(owner: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            owner: owner.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}
