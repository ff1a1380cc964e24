use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeployType, SecureLevel};

/// Pod of a running service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub status: String,
}

/// Status of a service as reported by the runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub svc_name: String,
    pub code: i32,
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicaInfo {
    pub actual: i32,
    pub desired: i32,
    pub instances: Vec<Instance>,
}

/// Status answer for polling clients, degraded to `Stopped` on failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployStatusReport {
    pub status: String,
    pub details: Vec<Instance>,
    pub message: String,
    pub reason: String,
    /// Failure that degraded the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Deploy as shown to users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployDetail {
    pub id: i64,
    pub deploy_name: String,
    pub space_id: i64,
    pub model_id: i64,
    pub repo_id: i64,
    pub user_id: i64,
    /// Repository path, `namespace/name`.
    pub path: String,
    pub status: String,
    pub hardware: String,
    pub env: String,
    pub runtime_framework: String,
    pub image_id: String,
    pub secure_level: SecureLevel,
    pub private: bool,
    pub endpoint: String,
    pub proxy_endpoint: String,
    pub provider: String,
    pub svc_name: String,
    pub cluster_id: String,
    pub git_branch: String,
    pub min_replica: i32,
    pub max_replica: i32,
    pub actual_replica: i32,
    pub desired_replica: i32,
    pub instances: Vec<Instance>,
    pub deploy_type: DeployType,
    pub sku: String,
    pub order_detail_id: i64,
    pub engine_args: String,
    pub variables: String,
    pub entrypoint: String,
    pub support_function_call: bool,
    pub message: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
