use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use domain_deploy::{
    model::{
        entity::Deploy,
        vo::{DeployNotification, DeployStatus},
    },
    repository::DeployTaskRepo,
};
use domain_webhook::{
    model::vo::{ServiceEvent, WebHookEventType, WebHookRecvEvent},
    service::WebHookExecutor,
};
use hub_architecture::{
    message_queue::MessageQueueProducerTemplate, repository::MutableRepository,
};
use tracing::{error, info, warn};
use typed_builder::TypedBuilder;

/// Writes service status changes reported by runners onto deploys.
#[derive(TypedBuilder)]
pub struct KServiceExecutor {
    deploy_task_repo: Arc<dyn DeployTaskRepo>,
    notification_producer: Arc<dyn MessageQueueProducerTemplate<DeployNotification>>,
    notification_topic: String,
}

impl KServiceExecutor {
    pub const EVENT_TYPES: [WebHookEventType; 3] = [
        WebHookEventType::RunnerServiceCreate,
        WebHookEventType::RunnerServiceChange,
        WebHookEventType::RunnerServiceStop,
    ];

    async fn update_deploy_status(&self, event: &ServiceEvent) -> anyhow::Result<()> {
        let status = event
            .deploy_status()
            .ok_or_else(|| anyhow!("unknown deploy status {} of service {}", event.status, event.service_name))?;

        let task = self
            .deploy_task_repo
            .get_deploy_task(event.task_id)
            .await
            .with_context(|| format!("failed to get deploy task {}", event.task_id))?
            .ok_or_else(|| anyhow!("deploy task {} not found", event.task_id))?;
        let last_task = self
            .deploy_task_repo
            .get_last_task_by_type(task.deploy_id, task.task_type)
            .await
            .with_context(|| format!("failed to get last task of deploy {}", task.deploy_id))?;
        if last_task.as_ref().map(|t| t.id) != Some(task.id) {
            warn!(
                task_id = task.id,
                last_task_id = ?last_task.map(|t| t.id),
                "skip deploy status update, event is for an outdated task"
            );
            return Ok(());
        }

        let Some(mut deploy) = self
            .deploy_task_repo
            .get_deploy_by_svc_name(&event.service_name)
            .await
            .with_context(|| format!("failed to get deploy by service name {}", event.service_name))?
        else {
            warn!(svc_name = %event.service_name, "skip deploy status update, no deploy found");
            return Ok(());
        };

        if deploy.status == DeployStatus::Stopped && status == DeployStatus::RunTimeError {
            warn!(deploy_id = deploy.id, "skip failure of a stopped deploy");
            return Ok(());
        }
        if deploy.status == DeployStatus::Deleted {
            warn!(deploy_id = deploy.id, "skip status update of a deleted deploy");
            return Ok(());
        }

        let old_status = deploy.status;
        deploy.status = status;
        deploy.message = event.message.clone();
        deploy.reason = event.reason.clone();
        deploy.endpoint = event.endpoint.clone();
        deploy.add_cluster_node(&event.cluster_node);
        if !event.queue_name.is_empty() {
            deploy.queue_name = event.queue_name.clone();
        }
        self.deploy_task_repo
            .update(&deploy)
            .await
            .with_context(|| format!("failed to update deploy {} status {}", event.service_name, event.status))?;
        info!(deploy_id = deploy.id, from = ?old_status, to = ?status, "deploy status updated");

        if status == DeployStatus::Running && old_status != DeployStatus::Running {
            self.notify(&deploy).await;
        }
        Ok(())
    }

    async fn notify(&self, deploy: &Deploy) {
        let notification = DeployNotification {
            deploy_id: deploy.id,
            deploy_name: deploy.deploy_name.clone(),
            deploy_type: deploy.deploy_type,
            user_uuid: deploy.user_uuid.clone(),
            svc_name: deploy.svc_name.clone(),
            status: deploy.status.display_name().to_owned(),
            endpoint: deploy.endpoint.clone(),
        };
        if let Err(e) = self
            .notification_producer
            .send_object(&notification, &self.notification_topic)
            .await
        {
            error!(deploy_id = deploy.id, "fail to send deploy notification: {e}");
        }
    }
}

#[async_trait]
impl WebHookExecutor for KServiceExecutor {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()> {
        info!(event_type = %event.event_type(), "deploy event received");
        let service_event: ServiceEvent =
            event.parse_data().context("failed to parse service event")?;
        self.update_deploy_status(&service_event).await
    }
}
