use super::*;
use mlh_core::STORE_CONNECT_ATTEMPTS;
use mlh_core::STORE_CONNECT_BACKOFF;
use std::sync::Arc;
use tokio_postgres::Client;

/// Table holding the objects of every Postgres-backed bucket.
#[rustfmt::skip]
pub const ARTIFACT: &str = "artifact";

#[rustfmt::skip]
const CREATES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ", ARTIFACT, " (
        bucket     TEXT   NOT NULL,
        key        TEXT   NOT NULL,
        body       BYTEA  NOT NULL,
        updated    BIGINT NOT NULL,
        PRIMARY KEY (bucket, key)
    );"
);
#[rustfmt::skip]
const PUT: &str = const_format::concatcp!(
    "INSERT INTO ", ARTIFACT, " (bucket, key, body, updated) VALUES ($1, $2, $3, $4)
     ON CONFLICT (bucket, key) DO UPDATE SET body = EXCLUDED.body, updated = EXCLUDED.updated"
);
#[rustfmt::skip]
const GET: &str = const_format::concatcp!(
    "SELECT body FROM ", ARTIFACT, " WHERE bucket = $1 AND key = $2"
);
#[rustfmt::skip]
const DELETE: &str = const_format::concatcp!(
    "DELETE FROM ", ARTIFACT, " WHERE bucket = $1 AND key = $2"
);
#[rustfmt::skip]
const KEYS: &str = const_format::concatcp!(
    "SELECT key FROM ", ARTIFACT, " WHERE bucket = $1 ORDER BY key"
);

/// Objects as rows of the shared [`ARTIFACT`] table, partitioned by bucket name.
pub struct Postgres {
    client: Arc<Client>,
    bucket: String,
}

impl Postgres {
    /// Wrap an open connection and make sure the table exists.
    pub async fn new(client: Arc<Client>, bucket: &str) -> Result<Self, StoreError> {
        client.batch_execute(CREATES).await?;
        Ok(Self {
            client,
            bucket: bucket.to_string(),
        })
    }

    /// Connect to `url`, retrying a bounded number of times while the
    /// database comes up. Operations after this are never retried.
    pub async fn connect(url: &str, bucket: &str) -> Result<Self, StoreError> {
        let mut attempt = 1;
        let client = loop {
            log::info!("connecting to database (attempt {})", attempt);
            match tokio_postgres::connect(url, tokio_postgres::tls::NoTls).await {
                Ok((client, connection)) => {
                    tokio::spawn(connection);
                    break client;
                }
                Err(e) if attempt < STORE_CONNECT_ATTEMPTS => {
                    log::warn!("database connection failed: {}", e);
                    tokio::time::sleep(STORE_CONNECT_BACKOFF).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };
        client
            .execute("SET client_min_messages TO WARNING", &[])
            .await?;
        Self::new(Arc::new(client), bucket).await
    }
}

#[async_trait::async_trait]
impl Bucket for Postgres {
    fn kind(&self) -> &'static str {
        "postgres"
    }
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let updated = mlh_core::now() as i64;
        self.client
            .execute(PUT, &[&self.bucket, &key, &body, &updated])
            .await?;
        Ok(())
    }
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .client
            .query_opt(GET, &[&self.bucket, &key])
            .await?
            .map(|row| row.get::<_, Vec<u8>>(0)))
    }
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.execute(DELETE, &[&self.bucket, &key]).await? > 0)
    }
    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .client
            .query(KEYS, &[&self.bucket])
            .await?
            .iter()
            .map(|row| row.get::<_, String>(0))
            .collect())
    }
    async fn ping(&self) -> Result<(), StoreError> {
        self.client.simple_query("SELECT 1").await?;
        Ok(())
    }
}
