use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_webhook::{
    model::{
        entity::ArgoWorkflow,
        vo::{WebHookEventType, WebHookRecvEvent},
    },
    repository::ArgoWorkflowRepo,
    service::WebHookExecutor,
};
use hub_architecture::repository::MutableRepository;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// Records workflow runs such as evaluations.
#[derive(TypedBuilder)]
pub struct WorkflowExecutor {
    argo_workflow_repo: Arc<dyn ArgoWorkflowRepo>,
}

impl WorkflowExecutor {
    pub const EVENT_TYPES: [WebHookEventType; 2] = [
        WebHookEventType::RunnerWorkflowCreate,
        WebHookEventType::RunnerWorkflowChange,
    ];
}

#[async_trait]
impl WebHookExecutor for WorkflowExecutor {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()> {
        let mut reported: ArgoWorkflow =
            event.parse_data().context("failed to parse workflow event")?;
        if reported.cluster_id.is_empty() {
            reported.cluster_id = event.header.cluster_id.clone();
        }

        let existing = self
            .argo_workflow_repo
            .find_by_task_id(&reported.task_id)
            .await
            .with_context(|| format!("failed to get workflow {}", reported.task_id))?;
        match existing {
            Some(mut workflow) => {
                workflow.apply_progress(&reported);
                self.argo_workflow_repo
                    .update(&workflow)
                    .await
                    .with_context(|| format!("failed to update workflow {}", workflow.task_id))?;
            }
            None => {
                if event.event_type() == WebHookEventType::RunnerWorkflowChange {
                    warn!(task_id = %reported.task_id, "change of an unknown workflow, recording it");
                }
                reported.id = 0;
                self.argo_workflow_repo
                    .insert(&reported)
                    .await
                    .with_context(|| format!("failed to create workflow {}", reported.task_id))?;
            }
        }
        info!(task_id = %reported.task_id, phase = ?reported.status, "workflow recorded");
        Ok(())
    }
}
