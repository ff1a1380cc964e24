use std::time::Duration;

use async_trait::async_trait;
use domain_lfs::service::{ObjectStat, ObjectStorageService};
use opendal::{services::S3, ErrorKind, Operator};

use crate::infrastructure::config::S3Config;

/// LFS object bucket on an S3 compatible server.
pub struct S3ObjectStorage {
    operator: Operator,
}

impl S3ObjectStorage {
    pub fn new(config: &S3Config) -> anyhow::Result<Self> {
        let mut builder = S3::default();
        builder
            .endpoint(&config.endpoint)
            .bucket(&config.bucket)
            .region(&config.region)
            .access_key_id(&config.access_key_id)
            .secret_access_key(&config.secret_access_key);
        Ok(Self {
            operator: Operator::new(builder)?.finish(),
        })
    }
}

#[async_trait]
impl ObjectStorageService for S3ObjectStorage {
    async fn presign_read(
        &self,
        key: &str,
        expire: Duration,
        content_disposition: Option<String>,
    ) -> anyhow::Result<String> {
        let request = match content_disposition {
            Some(disposition) => {
                self.operator
                    .presign_read_with(key, expire)
                    .override_content_disposition(&disposition)
                    .await?
            }
            None => self.operator.presign_read(key, expire).await?,
        };
        Ok(request.uri().to_string())
    }

    async fn presign_write(&self, key: &str, expire: Duration) -> anyhow::Result<String> {
        Ok(self.operator.presign_write(key, expire).await?.uri().to_string())
    }

    async fn write(&self, key: &str, content: Vec<u8>) -> anyhow::Result<()> {
        Ok(self.operator.write(key, content).await?)
    }

    async fn stat(&self, key: &str) -> anyhow::Result<Option<ObjectStat>> {
        match self.operator.stat(key).await {
            Ok(meta) => Ok(Some(ObjectStat {
                size: meta.content_length() as i64,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
