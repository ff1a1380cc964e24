use async_trait::async_trait;

use crate::model::{
    entity::Deploy,
    vo::{DeployRepo, DeployUpdateReq, HardWare, ReplicaInfo, ServiceStatus},
};

/// Remote execution backend running deploys as services.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Create a deploy and submit it, returning the new deploy id.
    async fn deploy(&self, dr: DeployRepo) -> anyhow::Result<i64>;
    /// Submit an existing deploy to run again.
    async fn start_deploy(&self, deploy: &Deploy) -> anyhow::Result<()>;
    async fn stop(&self, dr: &DeployRepo) -> anyhow::Result<()>;
    /// Remove the service and everything it owns on the runner.
    async fn purge(&self, dr: &DeployRepo) -> anyhow::Result<()>;
    /// Whether the service still exists on the runner.
    async fn exist(&self, dr: &DeployRepo) -> anyhow::Result<bool>;
    async fn status(&self, dr: &DeployRepo, need_details: bool) -> anyhow::Result<ServiceStatus>;
    /// Apply an update onto the stored deploy.
    async fn update_deploy(&self, req: &DeployUpdateReq, deploy: &Deploy) -> anyhow::Result<()>;
    async fn get_replica(&self, dr: &DeployRepo) -> anyhow::Result<ReplicaInfo>;
    /// Stream log lines of one instance.
    async fn instance_logs(&self, dr: &DeployRepo) -> anyhow::Result<flume::Receiver<String>>;
    async fn check_resource_available(
        &self,
        cluster_id: &str,
        order_detail_id: i64,
        hardware: &HardWare,
    ) -> anyhow::Result<bool>;
}
