use chrono::{DateTime, Utc};
use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

use crate::model::vo::{DeployStatus, DeployType, SecureLevel};

/// A running, or once running, instance of a repository on a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct Deploy {
    pub id: i64,
    pub deploy_name: String,
    pub space_id: i64,
    pub model_id: i64,
    pub repo_id: i64,
    pub user_id: i64,
    pub user_uuid: String,
    pub git_path: String,
    pub git_branch: String,
    /// JSON map of environment variables.
    pub env: String,
    /// JSON encoded `HardWare`.
    pub hardware: String,
    pub image_id: String,
    pub runtime_framework: String,
    pub container_port: i32,
    pub annotation: String,
    pub min_replica: i32,
    pub max_replica: i32,
    /// Service name on the runner, empty until deployed once.
    pub svc_name: String,
    pub endpoint: String,
    pub cluster_id: String,
    pub status: DeployStatus,
    pub secure_level: SecureLevel,
    pub deploy_type: DeployType,
    /// Id of the `SpaceResource` backing this deploy.
    pub sku: String,
    /// Non zero when the resource comes from a reserved order.
    pub order_detail_id: i64,
    /// JSON map of inference engine arguments.
    pub engine_args: String,
    /// JSON map of user variables.
    pub variables: String,
    pub message: String,
    pub reason: String,
    /// Comma separated node names the service was scheduled on.
    pub cluster_node: String,
    pub queue_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deploy {
    /// Record a node the service runs on, keeping each node once.
    pub fn add_cluster_node(&mut self, node: &str) {
        if node.is_empty() || self.cluster_node.split(',').any(|n| n == node) {
            return;
        }
        if !self.cluster_node.is_empty() {
            self.cluster_node.push(',');
        }
        self.cluster_node.push_str(node);
    }
}
