use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use domain_deploy::{
    model::entity::{ClusterInfo, ClusterRes},
    repository::ClusterInfoRepo,
};
use domain_webhook::{
    model::vo::{WebHookEventType, WebHookRecvEvent},
    service::WebHookExecutor,
};
use tracing::debug;
use typed_builder::TypedBuilder;

/// Keeps cluster status and resource snapshots fresh.
#[derive(TypedBuilder)]
pub struct HeartbeatExecutor {
    cluster_info_repo: Arc<dyn ClusterInfoRepo>,
}

impl HeartbeatExecutor {
    pub const EVENT_TYPES: [WebHookEventType; 1] = [WebHookEventType::RunnerHeartbeat];
}

#[async_trait]
impl WebHookExecutor for HeartbeatExecutor {
    async fn process_event(&self, event: &WebHookRecvEvent) -> anyhow::Result<()> {
        let resources: Vec<ClusterRes> =
            event.parse_data().context("failed to parse heartbeat event")?;
        let now = Utc::now();
        for mut res in resources {
            if res.cluster_id.is_empty() {
                res.cluster_id = event.header.cluster_id.clone();
            }
            let cluster = self
                .cluster_info_repo
                .get_by_cluster_id(&res.cluster_id)
                .await
                .with_context(|| format!("failed to get cluster {}", res.cluster_id))?;
            let cluster = match cluster {
                Some(mut cluster) => {
                    cluster.status = res.status;
                    cluster.resource = Some(res);
                    cluster.updated_at = now;
                    cluster
                }
                None => ClusterInfo {
                    cluster_id: res.cluster_id.clone(),
                    region: res.region.clone(),
                    zone: res.zone.clone(),
                    provider: res.provider.clone(),
                    storage_class: res.storage_class.clone(),
                    status: res.status,
                    enable: true,
                    resource: Some(res),
                    updated_at: now,
                    ..Default::default()
                },
            };
            self.cluster_info_repo
                .upsert(&cluster)
                .await
                .with_context(|| format!("failed to save cluster {}", cluster.cluster_id))?;
            debug!(cluster_id = %cluster.cluster_id, "cluster heartbeat recorded");
        }
        Ok(())
    }
}
