//! Key-value storage collaborators
//!
//! The planner persists a handful of JSON documents by key. Backends only
//! need `get`/`set`; [`PlannerStorage`] layers typed access and the
//! degrade-to-defaults policy on top.

use async_trait::async_trait;
use meal_planner_shared::StorageError;
use serde_json::Value;

pub mod file;
pub mod memory;
pub mod planner;
pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use planner::{PersistedState, PlannerStorage};
pub use self::redis::RedisStore;

/// JSON key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stored value, or `None` when the key has never been written
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), StorageError>;

    /// Backend name for logs and health output
    fn name(&self) -> &'static str;
}
