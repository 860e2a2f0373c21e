//! Storage crate: saved pages and the store abstraction behind them.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`page`] – Page (one saved link)
//! - [`repository`] – PageStore trait
//! - [`memory_store`] – MemoryPageStore (in-process, RwLock-guarded)
//! - [`page_repo`] – SqlitePageStore (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod memory_store;
mod page;
mod page_repo;
mod repository;
mod sqlite_pool;


pub use error::StorageError;
pub use memory_store::MemoryPageStore;
pub use page::Page;
pub use page_repo::SqlitePageStore;
pub use repository::PageStore;
pub use sqlite_pool::SqlitePoolManager;
