use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use domain_deploy::repository::DeployTaskRepo;
use domain_webhook::{
    model::vo::{ImageBuilderEvent, WebHookEventType, WebHookRecvEvent, WorkflowPhase},
    service::WebHookExecutor,
};
use hub_architecture::repository::{MutableRepository, ReadOnlyRepository};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// Follows image builds of deploys.
#[derive(TypedBuilder)]
pub struct ImageBuilderExecutor {
    deploy_task_repo: Arc<dyn DeployTaskRepo>,
}

impl ImageBuilderExecutor {
    pub const EVENT_TYPES: [WebHookEventType; 1] = [WebHookEventType::RunnerBuilderChange];

    async fn update_build_status(&self, event: &ImageBuilderEvent) -> anyhow::Result<()> {
        let mut task = self
            .deploy_task_repo
            .get_deploy_task(event.task_id)
            .await
            .with_context(|| format!("failed to get build task {}", event.task_id))?
            .ok_or_else(|| anyhow!("build task {} not found", event.task_id))?;
        let last_task = self
            .deploy_task_repo
            .get_last_task_by_type(task.deploy_id, task.task_type)
            .await
            .with_context(|| format!("failed to get last task of deploy {}", task.deploy_id))?;
        if last_task.map(|t| t.id) != Some(task.id) {
            warn!(task_id = task.id, "skip build status update, event is for an outdated task");
            return Ok(());
        }

        let mut deploy = self
            .deploy_task_repo
            .get_by_id(task.deploy_id)
            .await
            .with_context(|| format!("failed to get deploy {}", task.deploy_id))?
            .ok_or_else(|| anyhow!("deploy {} of build task {} not found", task.deploy_id, task.id))?;
        if !deploy.status.is_building() {
            warn!(
                deploy_id = deploy.id,
                status = ?deploy.status,
                "skip build status update, deploy is no longer building"
            );
            return Ok(());
        }

        let status = event.status.build_status();
        task.status = status.code();
        task.message = event.message.clone();
        self.deploy_task_repo
            .update_deploy_task(&task)
            .await
            .with_context(|| format!("failed to update build task {}", task.id))?;

        deploy.status = status;
        if event.status == WorkflowPhase::Succeeded && !event.image_path.is_empty() {
            deploy.image_id = event.image_path.clone();
        }
        self.deploy_task_repo
            .update(&deploy)
            .await
            .with_context(|| format!("failed to update deploy {}", deploy.id))?;
        info!(deploy_id = deploy.id, phase = ?event.status, "build status updated");
        Ok(())
    }
}

#[async_trait]
impl WebHookExecutor for ImageBuilderExecutor {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()> {
        let build_event: ImageBuilderEvent =
            event.parse_data().context("failed to parse image builder event")?;
        self.update_build_status(&build_event).await
    }
}
