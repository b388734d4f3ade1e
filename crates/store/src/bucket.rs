use super::*;

/// A flat key → bytes object store.
///
/// Each operation is a single call against the backing service with no
/// retries; per-object atomicity is whatever the backend provides.
#[async_trait::async_trait]
pub trait Bucket: Send + Sync {
    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;
    /// Write an object, replacing any previous one under the same key.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
    /// Read an object, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Remove an object, reporting whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
    /// All object keys, ascending.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;
    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}
