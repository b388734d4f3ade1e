use super::*;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Objects held in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct Memory {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory bucket lock poisoned".to_string())
}

#[async_trait::async_trait]
impl Bucket for Memory {
    fn kind(&self) -> &'static str {
        "memory"
    }
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.objects
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), body);
        Ok(())
    }
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.objects.read().map_err(poisoned)?.get(key).cloned())
    }
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.write().map_err(poisoned)?.remove(key).is_some())
    }
    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.objects.read().map_err(poisoned)?.keys().cloned().collect())
    }
    async fn ping(&self) -> Result<(), StoreError> {
        self.objects.read().map_err(poisoned).map(|_| ())
    }
}
