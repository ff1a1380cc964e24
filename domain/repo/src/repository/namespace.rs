use async_trait::async_trait;

use crate::model::entity::Namespace;

#[async_trait]
pub trait NamespaceRepo: Send + Sync {
    async fn find_by_path(&self, path: &str) -> anyhow::Result<Option<Namespace>>;
}
