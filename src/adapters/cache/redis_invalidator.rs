//! Redis-backed page-cache invalidator.
//!
//! The rendering layer caches page output under `page:<path>` keys;
//! invalidation is a DEL, and the next request re-renders.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::CacheInvalidator;

#[derive(Clone)]
pub struct RedisCacheInvalidator {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisCacheInvalidator {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "page:".to_string(),
        }
    }

    /// Override the default `page:` key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key_for(&self, path: &str) -> String {
        format!("{}{}", self.key_prefix, path)
    }
}

#[async_trait]
impl CacheInvalidator for RedisCacheInvalidator {
    async fn invalidate(&self, path: &str) -> Result<(), DomainError> {
        let key = self.key_for(path);
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&key).await.map_err(|e: redis::RedisError| {
            DomainError::new(
                ErrorCode::CacheError,
                format!("Failed to invalidate {}: {}", path, e),
            )
        })?;

        tracing::debug!(path = %path, "cache key dropped");
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheInvalidator")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}
