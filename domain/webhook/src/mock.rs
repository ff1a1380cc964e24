use async_trait::async_trait;
use hub_architecture::repository::{DBRepository, MutableRepository, ReadOnlyRepository};
use mockall::mock;

use crate::{
    exception::WebHookResult,
    model::{entity::ArgoWorkflow, vo::WebHookRecvEvent},
    repository::ArgoWorkflowRepo,
    service::{WebHookExecutor, WebHookService},
};

mock! {
    pub ArgoWorkflowRepo {}
    #[async_trait]
    impl ArgoWorkflowRepo for ArgoWorkflowRepo {
        async fn find_by_task_id(&self, task_id: &str) -> anyhow::Result<Option<ArgoWorkflow>>;
    }
    impl DBRepository<ArgoWorkflow> for ArgoWorkflowRepo {}
    #[async_trait]
    impl ReadOnlyRepository<ArgoWorkflow> for ArgoWorkflowRepo {
        async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<ArgoWorkflow>>;
    }
    #[async_trait]
    impl MutableRepository<ArgoWorkflow> for ArgoWorkflowRepo {
        async fn insert(&self, entity: &ArgoWorkflow) -> anyhow::Result<i64>;
        async fn update(&self, entity: &ArgoWorkflow) -> anyhow::Result<()>;
        async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;
    }
}

mock! {
    pub WebHookExecutor {}
    #[async_trait]
    impl WebHookExecutor for WebHookExecutor {
        async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()>;
    }
}

mock! {
    pub WebHookService {}
    #[async_trait]
    impl WebHookService for WebHookService {
        async fn handle_web_hook(&self, event: &WebHookRecvEvent) -> WebHookResult<()>;
        async fn dispatch_web_hook_event(&self) -> WebHookResult<()>;
    }
}
