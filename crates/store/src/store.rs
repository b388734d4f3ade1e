use super::*;
use mlh_core::STORE_SUFFIX;
use std::sync::Arc;

/// Skips the model body when only the metadata is wanted.
#[derive(serde::Deserialize)]
struct Head {
    meta: Metadata,
}

/// Named artifacts over a bucket.
///
/// Cheap to clone; clones share the bucket connection.
#[derive(Clone)]
pub struct Store {
    bucket: Arc<dyn Bucket>,
}

impl Store {
    pub fn new(bucket: impl Bucket + 'static) -> Self {
        Self {
            bucket: Arc::new(bucket),
        }
    }

    /// Bucket chosen by `STORE_BACKEND`: `memory`, `local` (default), or
    /// `postgres`.
    pub async fn from_env() -> Result<Self, StoreError> {
        use mlh_core::env;
        let bucket = env::var(env::STORE_BUCKET, mlh_core::STORE_BUCKET);
        match env::var(env::STORE_BACKEND, "local").as_str() {
            "memory" => Ok(Self::new(Memory::new())),
            "local" => {
                let root = env::var(env::STORE_PATH, mlh_core::STORE_PATH);
                let root = std::path::Path::new(&root).join(&bucket);
                Ok(Self::new(Local::open(root).await?))
            }
            "postgres" => {
                let url = std::env::var(env::DB_URL)
                    .map_err(|_| StoreError::unavailable(env::DB_URL, "not set"))?;
                Ok(Self::new(Postgres::connect(&url, &bucket).await?))
            }
            other => Err(StoreError::Unavailable(format!(
                "unknown {} {:?}",
                env::STORE_BACKEND,
                other
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.bucket.kind()
    }

    /// Object key for a model name.
    pub fn key(name: &str) -> Result<String, StoreError> {
        if mlh_core::valid_name(name) {
            Ok(format!("{}{}", name, STORE_SUFFIX))
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }

    /// Write unconditionally; the last writer wins.
    pub async fn save(&self, name: &str, artifact: &Artifact) -> Result<(), StoreError> {
        let ref key = Self::key(name)?;
        let body = serde_json::to_vec(artifact).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.bucket.put(key, body).await?;
        log::info!(
            "saved {} as {} (revision {})",
            artifact.meta.kind,
            key,
            artifact.meta.revision
        );
        Ok(())
    }

    pub async fn load(&self, name: &str) -> Result<Option<Artifact>, StoreError> {
        let ref key = Self::key(name)?;
        match self.bucket.get(key).await? {
            None => Ok(None),
            Some(bytes) => {
                let artifact = serde_json::from_slice::<Artifact>(&bytes)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e)))?;
                artifact.verify()?;
                Ok(Some(artifact))
            }
        }
    }

    /// Metadata alone, without decoding or verifying the model body.
    pub async fn metadata(&self, name: &str) -> Result<Option<Metadata>, StoreError> {
        let ref key = Self::key(name)?;
        match self.bucket.get(key).await? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice::<Head>(&bytes)
                .map(|head| Some(head.meta))
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e))),
        }
    }

    pub async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let ref key = Self::key(name)?;
        let existed = self.bucket.delete(key).await?;
        if existed {
            log::info!("deleted {}", key);
        }
        Ok(existed)
    }

    /// Names of stored models, ascending.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .bucket
            .keys()
            .await?
            .iter()
            .filter_map(|key| key.strip_suffix(STORE_SUFFIX))
            .filter(|name| mlh_core::valid_name(name))
            .map(String::from)
            .collect())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.bucket.ping().await
    }
}
