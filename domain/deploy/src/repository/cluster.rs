use async_trait::async_trait;

use crate::model::entity::ClusterInfo;

#[async_trait]
pub trait ClusterInfoRepo: Send + Sync {
    async fn get_by_cluster_id(&self, cluster_id: &str) -> anyhow::Result<Option<ClusterInfo>>;
    /// Insert or overwrite the cluster with the same `cluster_id`.
    async fn upsert(&self, cluster: &ClusterInfo) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<ClusterInfo>>;
}
