use async_trait::async_trait;

use crate::model::entity::LfsMetaObject;

#[async_trait]
pub trait LfsMetaObjectRepo: Send + Sync {
    async fn find_by_repo_id(&self, repository_id: i64) -> anyhow::Result<Vec<LfsMetaObject>>;
    async fn find_by_oid(&self, repository_id: i64, oid: &str) -> anyhow::Result<Option<LfsMetaObject>>;
    /// Insert or overwrite the object with the same repository and oid.
    async fn upsert(&self, object: &LfsMetaObject) -> anyhow::Result<()>;
}
