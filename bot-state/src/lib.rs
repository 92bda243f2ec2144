//! State crate: document storage backends and scoped bot state.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`storage`] – Storage trait and eTag rules
//! - [`memory_storage`] – MemoryStorage (process-local)
//! - [`sqlite_storage`] – SqliteStorage (sqlx)
//! - [`bot_state`] – BotState scopes and the PersistentState trait
//! - [`property_accessor`] – Typed property accessors

mod bot_state;
mod error;
mod memory_storage;
mod property_accessor;
mod sqlite_pool;
mod sqlite_storage;
mod storage;


pub use bot_state::{BotState, PersistentState, StateScope};
pub use error::StorageError;
pub use memory_storage::MemoryStorage;
pub use property_accessor::StatePropertyAccessor;
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_storage::SqliteStorage;
pub use storage::{Storage, ETAG_KEY};
