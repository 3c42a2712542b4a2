use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{TOKEN_STORAGE_KEY, TokenStore, TokenStoreResult};

/// Token kept in Redis, for shells that share state across restarts or hosts.
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: Arc<RedisClient>,
    key: String,
    ttl_secs: u64,
}

impl RedisTokenStore {
    /// `ttl_secs` should match the session lifetime; 0 stores without expiry.
    pub fn new(redis: Arc<RedisClient>, ttl_secs: u64) -> Self {
        Self {
            redis,
            key: TOKEN_STORAGE_KEY.to_string(),
            ttl_secs,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn get(&self) -> TokenStoreResult<Option<String>> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let token: Option<String> = conn.get(&self.key).await?;
        Ok(token)
    }

    async fn set(&self, token: &str) -> TokenStoreResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        if self.ttl_secs > 0 {
            let _: () = conn.set_ex(&self.key, token, self.ttl_secs).await?;
        } else {
            let _: () = conn.set(&self.key, token).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> TokenStoreResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let _: () = conn.del(&self.key).await?;
        Ok(())
    }
}
