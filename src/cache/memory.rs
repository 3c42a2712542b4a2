use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{TokenStore, TokenStoreResult};

/// Token slot held in process memory.
///
/// Clones share the slot, so a second `AuthSession` built from a clone sees
/// whatever the first one left behind.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        *store.lock() = Some(token.to_string());
        store
    }

    pub fn peek(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> TokenStoreResult<Option<String>> {
        Ok(self.peek())
    }

    async fn set(&self, token: &str) -> TokenStoreResult<()> {
        *self.lock() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> TokenStoreResult<()> {
        *self.lock() = None;
        Ok(())
    }
}
