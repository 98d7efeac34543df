use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;

use super::Storage;
use crate::AppError;

/// Process-local storage. Clones share the same objects; nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl Storage for MemoryStorage {
    async fn get_object(&mut self, key: &str) -> crate::AppResult<Bytes> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn put_object(&mut self, key: &str, data: Bytes) -> crate::AppResult<()> {
        self.objects.write().await.insert(key.to_owned(), data);
        Ok(())
    }
}
