use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use domain_deploy::repository::ClusterInfoRepo;
use domain_webhook::{
    model::vo::{ClusterEvent, WebHookEventType, WebHookRecvEvent},
    service::WebHookExecutor,
};
use tracing::info;
use typed_builder::TypedBuilder;

/// Registers clusters announced by runners.
#[derive(TypedBuilder)]
pub struct ClusterExecutor {
    cluster_info_repo: Arc<dyn ClusterInfoRepo>,
}

impl ClusterExecutor {
    pub const EVENT_TYPES: [WebHookEventType; 1] = [WebHookEventType::RunnerClusterCreate];
}

#[async_trait]
impl WebHookExecutor for ClusterExecutor {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()> {
        let cluster_event: ClusterEvent =
            event.parse_data().context("failed to parse cluster event")?;
        let mut cluster = self
            .cluster_info_repo
            .get_by_cluster_id(&cluster_event.cluster_id)
            .await
            .with_context(|| format!("failed to get cluster {}", cluster_event.cluster_id))?
            .unwrap_or_default();
        cluster_event.apply_to(&mut cluster);
        cluster.updated_at = Utc::now();
        self.cluster_info_repo
            .upsert(&cluster)
            .await
            .with_context(|| format!("failed to save cluster {}", cluster.cluster_id))?;
        info!(cluster_id = %cluster.cluster_id, endpoint = %cluster.endpoint, "cluster registered");
        Ok(())
    }
}
