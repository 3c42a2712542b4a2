// Persisted client-side state: the current session token under one fixed key.
// Absence of the key means "logged out".

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;
pub use self::redis::RedisTokenStore;

/// Storage key holding the session token.
pub const TOKEN_STORAGE_KEY: &str = "crm_auth_token";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token file: {0}")]
    Io(#[from] std::io::Error),
    #[error("redis: {0}")]
    Redis(#[from] ::redis::RedisError),
}

pub type TokenStoreResult<T> = Result<T, TokenStoreError>;

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> TokenStoreResult<Option<String>>;
    async fn set(&self, token: &str) -> TokenStoreResult<()>;
    async fn clear(&self) -> TokenStoreResult<()>;
}
