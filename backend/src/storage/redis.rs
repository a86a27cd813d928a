//! Redis-backed store
//!
//! Values are stored as JSON strings under their key.

use async_trait::async_trait;
use meal_planner_shared::StorageError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::info;

use super::KeyValueStore;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a managed connection; fails when the URL is invalid or the
    /// server cannot be reached
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)
            .map_err(|e| StorageError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client).await.map_err(redis_error)?;
        info!("Redis connection established");
        Ok(Self { conn })
    }
}

fn redis_error(err: redis::RedisError) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await.map_err(redis_error)?;
        raw.map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(StorageError::from)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let text = serde_json::to_string(&value)?;
        conn.set::<_, _, ()>(key, text).await.map_err(redis_error)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(redis_error)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
