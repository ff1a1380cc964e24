use async_trait::async_trait;
use domain_repo::model::vo::RepositoryType;

use crate::{
    exception::DeployResult,
    model::{
        entity::Deploy,
        vo::{DeployActReq, DeployDetail, DeployStatusReport, DeployUpdateReq},
    },
};

/// Lifecycle of deploys driven by users.
///
/// Every action goes through the permission gate picked by the deploy type
/// before touching the runner or the store.
#[async_trait]
pub trait DeployLifecycleService: Send + Sync {
    /// Start a deploy, restarting a stale service but never a running one.
    async fn deploy_start(&self, req: &DeployActReq) -> DeployResult<()>;

    /// Stop the service and mark the deploy stopped.
    async fn deploy_stop(&self, req: &DeployActReq) -> DeployResult<()>;

    /// Update a deploy. Fields requiring a restart are refused while the service exists.
    async fn deploy_update(&self, req: &DeployActReq, update: &DeployUpdateReq)
        -> DeployResult<()>;

    /// Purge the service then delete the deploy, releasing a reserved resource.
    async fn delete_deploy(&self, req: &DeployActReq) -> DeployResult<()>;

    async fn deploy_detail(&self, req: &DeployActReq) -> DeployResult<DeployDetail>;

    /// Best-effort status, failures degrade to `Stopped`.
    async fn deploy_status(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        deploy_id: i64,
    ) -> DeployStatusReport;

    async fn deploy_instance_logs(&self, req: &DeployActReq)
        -> DeployResult<flume::Receiver<String>>;

    /// Deploys the user owns on a repository.
    async fn list_deploy(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        current_user: &str,
    ) -> DeployResult<Vec<DeployDetail>>;

    async fn allow_access_deploy(&self, req: &DeployActReq) -> DeployResult<bool>;

    async fn allow_read_access_by_deploy_id(
        &self,
        repo_type: RepositoryType,
        namespace: &str,
        name: &str,
        current_user: &str,
        deploy_id: i64,
    ) -> DeployResult<bool>;

    async fn get_deploy_by_svc_name(&self, svc_name: &str) -> DeployResult<Deploy>;

    /// Public endpoint and cluster provider of a deploy.
    async fn generate_endpoint(&self, deploy: &Deploy) -> (String, String);
}
