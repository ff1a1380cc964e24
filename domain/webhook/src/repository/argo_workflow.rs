use async_trait::async_trait;
use hub_architecture::repository::DBRepository;

use crate::model::entity::ArgoWorkflow;

#[async_trait]
pub trait ArgoWorkflowRepo: DBRepository<ArgoWorkflow> + Send + Sync {
    async fn find_by_task_id(&self, task_id: &str) -> anyhow::Result<Option<ArgoWorkflow>>;
}
