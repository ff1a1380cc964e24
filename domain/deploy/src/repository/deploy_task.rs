use async_trait::async_trait;
use domain_repo::model::vo::RepositoryType;
use hub_architecture::repository::DBRepository;

use crate::model::entity::{Deploy, DeployTask, DeployTaskType};

/// Store of deploys and their build/run tasks.
#[async_trait]
pub trait DeployTaskRepo: DBRepository<Deploy> + Send + Sync {
    async fn get_deploy_by_svc_name(&self, svc_name: &str) -> anyhow::Result<Option<Deploy>>;

    /// The serverless deploy of a repository, at most one exists.
    async fn get_serverless_deploy_by_repo_id(&self, repo_id: i64)
        -> anyhow::Result<Option<Deploy>>;

    /// Deploys of a user on a repository, newest first.
    async fn list_deploy(
        &self,
        repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
    ) -> anyhow::Result<Vec<Deploy>>;

    /// Mark a deploy as stopped.
    async fn stop_deploy(
        &self,
        repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<()>;

    /// Mark a deploy as deleted, model listings no longer show it.
    async fn delete_deploy(
        &self,
        repo_type: RepositoryType,
        repo_id: i64,
        user_id: i64,
        deploy_id: i64,
    ) -> anyhow::Result<()>;

    /// Remove a deploy and its tasks.
    async fn delete_deploy_now(&self, deploy_id: i64) -> anyhow::Result<()>;

    async fn get_deploy_task(&self, task_id: i64) -> anyhow::Result<Option<DeployTask>>;

    /// Latest task of the given type for a deploy.
    async fn get_last_task_by_type(
        &self,
        deploy_id: i64,
        task_type: DeployTaskType,
    ) -> anyhow::Result<Option<DeployTask>>;

    async fn create_deploy_task(&self, task: &DeployTask) -> anyhow::Result<i64>;

    async fn update_deploy_task(&self, task: &DeployTask) -> anyhow::Result<()>;
}
