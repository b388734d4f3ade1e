use super::*;
use std::path::Path;
use std::path::PathBuf;

/// Objects as files in a single directory.
///
/// Writes land in a hidden temporary file first and are renamed into place,
/// so readers see either the old object or the new one.
#[derive(Debug, Clone)]
pub struct Local {
    root: PathBuf,
}

impl Local {
    /// Open a bucket rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::unavailable(&root.display().to_string(), e))?;
        log::info!("using local bucket at {}", root.display());
        Ok(Self { root })
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait::async_trait]
impl Bucket for Local {
    fn kind(&self) -> &'static str {
        "local"
    }
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let ref temp = self.root.join(format!(".{}.{}.tmp", key, uuid::Uuid::now_v7()));
        tokio::fs::write(temp, body).await?;
        if let Err(e) = tokio::fs::rename(temp, self.path(key)).await {
            let _ = tokio::fs::remove_file(temp).await;
            return Err(e.into());
        }
        Ok(())
    }
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path(key)).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
    async fn ping(&self) -> Result<(), StoreError> {
        match tokio::fs::metadata(&self.root).await? {
            meta if meta.is_dir() => Ok(()),
            _ => Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                self.root.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn files_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = Local::open(dir.path().join("models")).await.unwrap();
        assert_eq!(bucket.get("forest.json").await, Ok(None));
        bucket.put("forest.json", b"{}".to_vec()).await.unwrap();
        bucket.put("logreg.json", b"[]".to_vec()).await.unwrap();
        assert_eq!(bucket.get("forest.json").await, Ok(Some(b"{}".to_vec())));
        assert_eq!(
            bucket.keys().await,
            Ok(vec!["forest.json".to_string(), "logreg.json".to_string()])
        );
        assert_eq!(bucket.delete("forest.json").await, Ok(true));
        assert_eq!(bucket.delete("forest.json").await, Ok(false));
        assert!(bucket.ping().await.is_ok());
    }

    #[tokio::test]
    async fn no_temporary_files_remain() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = Local::open(dir.path()).await.unwrap();
        bucket.put("a.json", b"1".to_vec()).await.unwrap();
        bucket.put("a.json", b"2".to_vec()).await.unwrap();
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn missing_root_fails_ping() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = Local::open(dir.path().join("gone")).await.unwrap();
        std::fs::remove_dir(bucket.root()).unwrap();
        assert!(matches!(bucket.ping().await, Err(StoreError::Unavailable(_))));
    }
}
