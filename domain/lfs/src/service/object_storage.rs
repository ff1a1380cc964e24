use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectStat {
    pub size: i64,
}

/// Bucket holding LFS object content.
#[async_trait]
pub trait ObjectStorageService: Send + Sync {
    /// Presigned GET url, optionally overriding the response content disposition.
    async fn presign_read(
        &self,
        key: &str,
        expire: Duration,
        content_disposition: Option<String>,
    ) -> anyhow::Result<String>;
    /// Presigned PUT url, letting clients upload without passing through the hub.
    async fn presign_write(&self, key: &str, expire: Duration) -> anyhow::Result<String>;
    async fn write(&self, key: &str, content: Vec<u8>) -> anyhow::Result<()>;
    /// `None` when the key doesn't exist.
    async fn stat(&self, key: &str) -> anyhow::Result<Option<ObjectStat>>;
}
