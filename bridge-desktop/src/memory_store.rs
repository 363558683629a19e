//! In-memory secure store
//!
//! Process-local storage for tests and for hosts without an OS keychain.
//! Nothing survives a restart.

use async_trait::async_trait;
use bridge_traits::{error::Result, storage::SecureStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemorySecureStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_delete() {
        let store = MemorySecureStore::new();
        store.set_secret("token", b"abc").await.unwrap();

        assert_eq!(store.get_secret("token").await.unwrap(), Some(b"abc".to_vec()));
        assert!(store.has_secret("token").await.unwrap());

        store.delete_secret("token").await.unwrap();
        assert!(store.get_secret("token").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let store = MemorySecureStore::new();
        assert!(store.delete_secret("absent").await.is_ok());
    }
}
